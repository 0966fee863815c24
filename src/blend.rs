use crate::frame::Frame;

/// Linear crossfade between two equal-sized frames.
///
/// Each channel is `(1 - alpha) * a + alpha * b`, rounded to nearest and
/// saturated into the 8-bit range. Equal dimensions are a precondition;
/// `FrameSequence` validates its timeline once up front.
pub fn crossfade(a: &Frame, b: &Frame, alpha: f32) -> Frame {
    debug_assert_eq!(a.size(), b.size(), "crossfade frames must share dimensions");
    debug_assert_eq!(a.data.len(), b.data.len());

    let mut data = vec![0u8; a.data.len()];
    for ((d, &av), &bv) in data.iter_mut().zip(&a.data).zip(&b.data) {
        *d = lerp_u8(av, bv, alpha);
    }

    Frame {
        width: a.width,
        height: a.height,
        data,
    }
}

fn lerp_u8(a: u8, b: u8, alpha: f32) -> u8 {
    let v = (1.0 - alpha) * f32::from(a) + alpha * f32::from(b);
    v.round().clamp(0.0, 255.0) as u8
}
