use crate::definitions::ImageSize;
use crate::usb::errors::FrameError;

/// Converts a biplanar 4:2:0 frame (NV12) into packed 4:2:2 YUY2.
///
/// Each output pixel carries its own luma followed by the chroma sample shared with its horizontal
/// neighbour: blue-difference on even columns, red-difference on odd columns. Chroma lines are reused for
/// two consecutive output lines.
pub fn nv12_to_yuy2(size: ImageSize, y_plane: &[u8], uv_plane: &[u8]) -> Result<Vec<u8>, FrameError> {
    let width = size.width as usize;
    let height = size.height as usize;

    let y_len = width * height;
    if y_plane.len() < y_len {
        return Err(FrameError::PlaneTooShort { plane: "Y", expected: y_len, actual: y_plane.len() });
    }
    let uv_len = width * height.div_ceil(2);
    if uv_plane.len() < uv_len {
        return Err(FrameError::PlaneTooShort { plane: "UV", expected: uv_len, actual: uv_plane.len() });
    }

    let mut frame = vec![0u8; size.frame_len()];
    if width == 0 {
        return Ok(frame);
    }
    for (line, output_line) in frame.chunks_exact_mut(width * 2).enumerate() {
        let luma = &y_plane[width * line..width * (line + 1)];
        let chroma = &uv_plane[width * (line / 2)..width * (line / 2 + 1)];
        for (col, pixel) in output_line.chunks_exact_mut(2).enumerate() {
            pixel[0] = luma[col];
            // interleaved U/V pairs line up with the even/odd output columns
            pixel[1] = chroma[col];
        }
    }
    Ok(frame)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chroma_alternates_u_and_v_and_repeats_per_line_pair() {
        let size = ImageSize::new(4, 2);
        let y_plane = [10, 11, 12, 13, 20, 21, 22, 23];
        let uv_plane = [100, 200, 101, 201];

        let frame = nv12_to_yuy2(size, &y_plane, &uv_plane).unwrap();
        assert_eq!(frame, vec![
            10, 100, 11, 200, 12, 101, 13, 201,
            20, 100, 21, 200, 22, 101, 23, 201,
        ]);
    }

    #[test]
    fn output_has_two_bytes_per_pixel() {
        let size = ImageSize::new(160, 120);
        let frame = nv12_to_yuy2(size, &vec![0u8; 160 * 120], &vec![128u8; 160 * 60]).unwrap();
        assert_eq!(frame.len(), size.frame_len());
    }

    #[test]
    fn short_planes_are_rejected() {
        let size = ImageSize::new(4, 2);
        assert_eq!(
            nv12_to_yuy2(size, &[0u8; 7], &[0u8; 4]),
            Err(FrameError::PlaneTooShort { plane: "Y", expected: 8, actual: 7 })
        );
        assert_eq!(
            nv12_to_yuy2(size, &[0u8; 8], &[0u8; 3]),
            Err(FrameError::PlaneTooShort { plane: "UV", expected: 4, actual: 3 })
        );
    }
}
