use crate::test_buffer::TestBuffer;
use crate::{
    Axis, ByteCursor, ChannelFlags, Endian, Error, Quaternion, RotationQuantization,
    ScalarQuantization, SplineChannel, SplineTrackQuaternion, SplineTrackVector3, TransformTrack,
};

fn assert_approx(actual: f32, expected: f32) {
    let diff = (actual - expected).abs();
    assert!(
        diff <= 1.0e-4,
        "expected {expected}, got {actual} (diff {diff})"
    );
}

// Linear curve, spline X in [0, 30], static Y = 4.5, Z absent.
fn linear_vector_bytes(endian: Endian) -> Vec<u8> {
    TestBuffer::new(endian)
        .i16(2)
        .u8(1)
        .u8s(&[0, 0, 10, 20, 20])
        .pad(4)
        .f32(0.0)
        .f32(30.0)
        .f32(4.5)
        .u16(0)
        .u16(21845)
        .u16(65535)
        .finish()
}

fn linear_vector(endian: Endian) -> SplineTrackVector3 {
    let bytes = linear_vector_bytes(endian);
    let mut c = ByteCursor::new(&bytes, endian);
    let flags = ChannelFlags::from_bits(ChannelFlags::SPLINE_X | ChannelFlags::STATIC_Y);
    let track = SplineTrackVector3::read(&mut c, flags, ScalarQuantization::Bits16).unwrap();
    assert_eq!(c.position(), bytes.len());
    track
}

#[test]
fn vector_track_reads_header_bounds_and_values() {
    let track = linear_vector(Endian::Little);
    assert_eq!(track.degree(), 1);
    assert_eq!(track.knots(), [0, 0, 10, 20, 20]);

    let x = track.channel(Axis::X).unwrap();
    assert!(x.is_dynamic());
    assert_eq!(x.values().len(), 3);
    assert_eq!(x.values()[0], 0.0);
    assert_approx(x.values()[1], 10.0);
    assert_eq!(x.values()[2], 30.0);

    let y = track.channel(Axis::Y).unwrap();
    assert!(!y.is_dynamic());
    assert_eq!(y.values(), [4.5]);

    assert!(track.channel(Axis::Z).is_none());
    assert!(track.channel(Axis::W).is_none());
}

#[test]
fn vector_track_reads_big_endian() {
    assert_eq!(linear_vector(Endian::Big), linear_vector(Endian::Little));
}

#[test]
fn vector_track_samples_each_axis() {
    let track = linear_vector(Endian::Little);

    let v = track.value_at(5.0, 0.0);
    assert_approx(v[0], 5.0);
    assert_eq!(v[1], 4.5);
    assert_eq!(v[2], 0.0);

    let v = track.value_at(15.0, 1.0);
    assert_approx(v[0], 20.0);
    assert_eq!(v[1], 4.5);
    assert_eq!(v[2], 1.0);

    assert_eq!(track.axis_at(Axis::X, 20.0, 0.0), 30.0);
}

#[test]
fn single_control_point_is_held() {
    let bytes = TestBuffer::le()
        .i16(0)
        .u8(1)
        .u8s(&[0, 40])
        .pad(4)
        .f32(-1.0)
        .f32(3.0)
        .u8(255)
        .finish();
    let mut c = ByteCursor::new(&bytes, Endian::Little);
    let flags = ChannelFlags::from_bits(ChannelFlags::SPLINE_Z);
    let track = SplineTrackVector3::read(&mut c, flags, ScalarQuantization::Bits8).unwrap();
    assert_eq!(c.position(), 17);

    for frame in [0.0, 12.5, 40.0] {
        assert_eq!(track.value_at(frame, 0.0), [0.0, 0.0, 3.0]);
    }
}

#[test]
fn constant_channel_ignores_frame_and_knots() {
    let channel = SplineChannel::constant(2.5f32);
    assert_eq!(channel.value_at(3, &[], 0.0), 2.5);
    assert_eq!(channel.value_at(3, &[], 99.0), 2.5);
}

#[test]
fn quaternion_track_uncompressed() {
    let bytes = TestBuffer::be()
        .i16(1)
        .u8(1)
        .u8s(&[0, 0, 10, 10])
        .pad(4)
        .f32(1.0)
        .f32(0.0)
        .f32(0.0)
        .f32(0.0)
        .f32(0.0)
        .f32(1.0)
        .f32(0.0)
        .f32(0.0)
        .finish();
    let mut c = ByteCursor::new(&bytes, Endian::Big);
    let track = SplineTrackQuaternion::read(&mut c, RotationQuantization::Uncompressed).unwrap();
    assert_eq!(c.position(), 40);
    assert_eq!(track.channel().values().len(), 2);

    assert_eq!(track.value_at(0.0), Quaternion::new(1.0, 0.0, 0.0, 0.0));
    let q = track.value_at(5.0);
    assert_approx(q.x, 0.5);
    assert_approx(q.y, 0.5);
    assert_approx(q.length(), 0.5f32.sqrt());
}

#[test]
fn quaternion_track_pads_to_quantization_alignment() {
    // 3 + 6 knot bytes leaves the cursor at 9; THREECOMP48 aligns to 2.
    let identity = [0xBFFFu16, 0xBFFF, 0x3FFF];
    let mut buffer = TestBuffer::le();
    buffer.i16(2).u8(2).u8s(&[0, 0, 0, 10, 10, 10]).pad(2);
    assert_eq!(buffer.len(), 10);
    for _ in 0..3 {
        for v in identity {
            buffer.u16(v);
        }
    }
    let bytes = buffer.finish();

    let mut c = ByteCursor::new(&bytes, Endian::Little);
    let track = SplineTrackQuaternion::read(&mut c, RotationQuantization::ThreeComp48).unwrap();
    assert_eq!(c.position(), 28);
    assert!(track.channel().values().iter().all(|&q| q == Quaternion::IDENTITY));

    let q = track.value_at(4.0);
    assert_approx(q.w, 1.0);
    assert_eq!(q.x, 0.0);
}

#[test]
fn invalid_spline_headers_are_rejected() {
    let bytes = TestBuffer::le().u32(0).i16(3).u8(5).u8s(&[0; 16]).finish();
    let mut c = ByteCursor::new(&bytes, Endian::Little);
    c.read_u32().unwrap();
    assert_eq!(
        SplineTrackQuaternion::read(&mut c, RotationQuantization::Polar32),
        Err(Error::InvalidSplineHeader {
            offset: 4,
            num_items: 3,
            degree: 5
        })
    );

    let bytes = TestBuffer::le().i16(-1).u8(1).u8s(&[0; 16]).finish();
    let mut c = ByteCursor::new(&bytes, Endian::Little);
    let flags = ChannelFlags::from_bits(ChannelFlags::SPLINE_X);
    assert_eq!(
        SplineTrackVector3::read(&mut c, flags, ScalarQuantization::Bits8),
        Err(Error::InvalidSplineHeader {
            offset: 0,
            num_items: -1,
            degree: 1
        })
    );
}

#[test]
fn truncated_knots_underrun() {
    let bytes = TestBuffer::le().i16(10).u8(3).u8s(&[0; 5]).finish();
    let mut c = ByteCursor::new(&bytes, Endian::Little);
    let flags = ChannelFlags::from_bits(ChannelFlags::SPLINE_X);
    assert_eq!(
        SplineTrackVector3::read(&mut c, flags, ScalarQuantization::Bits8),
        Err(Error::BufferUnderrun {
            offset: 3,
            needed: 15,
            len: 8
        })
    );
}

#[test]
fn default_track_is_neutral() {
    let track = TransformTrack::default();
    let sample = track.sample(12.0);
    assert_eq!(sample.position, [0.0; 3]);
    assert_eq!(sample.rotation, Quaternion::IDENTITY);
    assert_eq!(sample.scale, [1.0; 3]);
}

#[test]
fn spline_is_used_only_when_flagged() {
    let mut track = TransformTrack {
        static_position: [1.0, 2.0, 3.0],
        spline_position: Some(linear_vector(Endian::Little)),
        ..TransformTrack::default()
    };
    assert_eq!(track.position_at(5.0), [1.0, 2.0, 3.0]);

    track.has_spline_position = true;
    let p = track.position_at(5.0);
    assert_approx(p[0], 5.0);
    assert_eq!(p[1], 4.5);
    assert_eq!(p[2], 0.0);
}

#[test]
fn scale_spline_defaults_missing_axes_to_one() {
    let track = TransformTrack {
        has_spline_scale: true,
        spline_scale: Some(linear_vector(Endian::Little)),
        ..TransformTrack::default()
    };
    let s = track.scale_at(0.0);
    assert_eq!(s, [0.0, 4.5, 1.0]);
    assert_eq!(track.sample(0.0).scale, s);
}

#[test]
fn fewer_control_points_than_degree_needs_are_rejected() {
    let bytes = TestBuffer::le().i16(1).u8(2).u8s(&[0; 32]).finish();
    let mut c = ByteCursor::new(&bytes, Endian::Little);
    assert_eq!(
        SplineTrackQuaternion::read(&mut c, RotationQuantization::Uncompressed),
        Err(Error::InvalidSplineHeader {
            offset: 0,
            num_items: 1,
            degree: 2
        })
    );

    // A lone control point is valid at any degree.
    let bytes = TestBuffer::le()
        .i16(0)
        .u8(3)
        .u8s(&[0, 0, 0, 0, 0])
        .f32(0.0)
        .f32(0.0)
        .f32(0.0)
        .f32(1.0)
        .finish();
    let mut c = ByteCursor::new(&bytes, Endian::Little);
    let track = SplineTrackQuaternion::read(&mut c, RotationQuantization::Uncompressed).unwrap();
    assert_eq!(track.value_at(7.0), Quaternion::IDENTITY);
}
