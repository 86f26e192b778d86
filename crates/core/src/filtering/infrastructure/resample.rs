//! Interleaved 8-bit image resampling used by the pixelate filter.

/// Resize with bilinear interpolation, sampling at pixel centres.
///
/// Source coordinates are `(dst + 0.5) * src / dst - 0.5`, clamped to the
/// image so edge pixels are replicated rather than blended with black.
pub fn resize_bilinear(
    data: &[u8],
    width: usize,
    height: usize,
    channels: usize,
    target_w: usize,
    target_h: usize,
) -> Vec<u8> {
    let mut out = vec![0u8; target_w * target_h * channels];
    if width == 0 || height == 0 || target_w == 0 || target_h == 0 {
        return out;
    }

    let xs: Vec<(usize, usize, f32)> = (0..target_w)
        .map(|x| axis_sample(x, width, target_w))
        .collect();

    for y in 0..target_h {
        let (y0, y1, fy) = axis_sample(y, height, target_h);
        for (x, &(x0, x1, fx)) in xs.iter().enumerate() {
            for c in 0..channels {
                let v00 = data[(y0 * width + x0) * channels + c] as f32;
                let v10 = data[(y0 * width + x1) * channels + c] as f32;
                let v01 = data[(y1 * width + x0) * channels + c] as f32;
                let v11 = data[(y1 * width + x1) * channels + c] as f32;

                let top = v00 + (v10 - v00) * fx;
                let bottom = v01 + (v11 - v01) * fx;
                let val = top + (bottom - top) * fy;
                out[(y * target_w + x) * channels + c] = val.round().clamp(0.0, 255.0) as u8;
            }
        }
    }

    out
}

/// Resize with nearest-neighbour sampling: `src = floor(dst * src_len / dst_len)`.
pub fn resize_nearest(
    data: &[u8],
    width: usize,
    height: usize,
    channels: usize,
    target_w: usize,
    target_h: usize,
) -> Vec<u8> {
    let mut out = vec![0u8; target_w * target_h * channels];
    if width == 0 || height == 0 || target_w == 0 || target_h == 0 {
        return out;
    }

    for y in 0..target_h {
        let sy = (y * height / target_h).min(height - 1);
        for x in 0..target_w {
            let sx = (x * width / target_w).min(width - 1);
            let src = (sy * width + sx) * channels;
            let dst = (y * target_w + x) * channels;
            out[dst..dst + channels].copy_from_slice(&data[src..src + channels]);
        }
    }

    out
}

/// Left/right source indices and blend weight for one destination index.
fn axis_sample(dst: usize, src_len: usize, dst_len: usize) -> (usize, usize, f32) {
    let scale = src_len as f32 / dst_len as f32;
    let pos = (dst as f32 + 0.5) * scale - 0.5;
    if pos <= 0.0 {
        return (0, 0, 0.0);
    }
    let i0 = pos.floor() as usize;
    if i0 >= src_len - 1 {
        return (src_len - 1, src_len - 1, 0.0);
    }
    (i0, i0 + 1, pos - i0 as f32)
}
