//! Decoded curves and their readers.

use crate::nurbs::{ControlPoint, MAX_DEGREE, evaluate, find_knot_span};
use crate::{
    Axis, ByteCursor, ChannelFlags, Error, Quaternion, RotationQuantization, ScalarQuantization,
    TransformMask, decode_rotation, decode_scalar,
};
use log::trace;

/// Control points of one curve component.
///
/// A non-dynamic channel holds exactly one value and is not a spline. A dynamic channel
/// holds `numItems + 1` control points.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct SplineChannel<T> {
    values: Vec<T>,
    is_dynamic: bool,
}

impl<T: ControlPoint> SplineChannel<T> {
    pub(crate) fn constant(value: T) -> Self {
        Self {
            values: vec![value],
            is_dynamic: false,
        }
    }

    pub(crate) fn dynamic(capacity: usize) -> Self {
        Self {
            values: Vec::with_capacity(capacity),
            is_dynamic: true,
        }
    }

    pub fn values(&self) -> &[T] {
        &self.values
    }

    pub fn is_dynamic(&self) -> bool {
        self.is_dynamic
    }

    /// Samples the channel against the owning track's knot vector.
    ///
    /// A dynamic channel needs `knots.len() >= values().len() + degree + 1`, which every
    /// channel read from a buffer satisfies.
    pub fn value_at(&self, degree: u8, knots: &[u8], frame: f32) -> T {
        let degree = degree as usize;
        // numItems = 0: a single control point, held for every frame.
        if !self.is_dynamic || self.values.len() == 1 {
            return self.values[0];
        }
        let span = find_knot_span(degree, frame, self.values.len(), knots);
        evaluate(span, degree, frame, knots, &self.values)
    }
}

fn read_spline_header(cursor: &mut ByteCursor<'_>) -> Result<(u8, Vec<u8>, usize), Error> {
    let offset = cursor.position();
    let num_items = cursor.read_i16()?;
    let degree = cursor.read_u8()?;
    // More than one control point needs at least degree + 1 of them.
    let too_few = num_items > 0 && (num_items as usize) < degree as usize;
    if num_items < 0 || degree as usize > MAX_DEGREE || too_few {
        return Err(Error::InvalidSplineHeader {
            offset,
            num_items,
            degree,
        });
    }

    let control_points = num_items as usize + 1;
    let knots = cursor
        .read_bytes(control_points + degree as usize + 1)?
        .to_vec();
    trace!("spline header @{offset:#x}: numItems={num_items} degree={degree}");
    Ok((degree, knots, control_points))
}

/// Position or scale curve: up to three scalar channels sharing one knot vector.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct SplineTrackVector3 {
    degree: u8,
    knots: Vec<u8>,
    x: Option<SplineChannel<f32>>,
    y: Option<SplineChannel<f32>>,
    z: Option<SplineChannel<f32>>,
}

impl SplineTrackVector3 {
    pub fn read(
        cursor: &mut ByteCursor<'_>,
        flags: ChannelFlags,
        quantization: ScalarQuantization,
    ) -> Result<Self, Error> {
        let (degree, knots, control_points) = read_spline_header(cursor)?;
        cursor.pad(4);

        let mut channels: [Option<SplineChannel<f32>>; 3] = [None, None, None];
        let mut bounds = [(0.0f32, 0.0f32); 3];
        for (i, axis) in Axis::XYZ.into_iter().enumerate() {
            if flags.is_spline(axis) {
                let min = cursor.read_f32()?;
                let max = cursor.read_f32()?;
                bounds[i] = (min, max);
                channels[i] = Some(SplineChannel::dynamic(control_points));
            } else if flags.is_static(axis) {
                channels[i] = Some(SplineChannel::constant(cursor.read_f32()?));
            }
        }

        for _ in 0..control_points {
            for (i, axis) in Axis::XYZ.into_iter().enumerate() {
                if !flags.is_spline(axis) {
                    continue;
                }
                let (min, max) = bounds[i];
                let value = decode_scalar(cursor, min, max, quantization)?;
                if let Some(channel) = channels[i].as_mut() {
                    channel.values.push(value);
                }
            }
        }

        let [x, y, z] = channels;
        Ok(Self {
            degree,
            knots,
            x,
            y,
            z,
        })
    }

    pub fn degree(&self) -> u8 {
        self.degree
    }

    pub fn knots(&self) -> &[u8] {
        &self.knots
    }

    pub fn channel(&self, axis: Axis) -> Option<&SplineChannel<f32>> {
        match axis {
            Axis::X => self.x.as_ref(),
            Axis::Y => self.y.as_ref(),
            Axis::Z => self.z.as_ref(),
            Axis::W => None,
        }
    }

    /// Samples one axis; `neutral` is returned when the axis is not encoded.
    pub fn axis_at(&self, axis: Axis, frame: f32, neutral: f32) -> f32 {
        self.channel(axis)
            .map(|c| c.value_at(self.degree, &self.knots, frame))
            .unwrap_or(neutral)
    }

    pub fn value_at(&self, frame: f32, neutral: f32) -> [f32; 3] {
        [
            self.axis_at(Axis::X, frame, neutral),
            self.axis_at(Axis::Y, frame, neutral),
            self.axis_at(Axis::Z, frame, neutral),
        ]
    }
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct SplineTrackQuaternion {
    degree: u8,
    knots: Vec<u8>,
    channel: SplineChannel<Quaternion>,
}

impl SplineTrackQuaternion {
    pub fn read(
        cursor: &mut ByteCursor<'_>,
        quantization: RotationQuantization,
    ) -> Result<Self, Error> {
        let (degree, knots, control_points) = read_spline_header(cursor)?;
        cursor.pad(quantization.align());

        let mut channel = SplineChannel::dynamic(control_points);
        for _ in 0..control_points {
            channel.values.push(decode_rotation(cursor, quantization)?);
        }

        Ok(Self {
            degree,
            knots,
            channel,
        })
    }

    pub fn degree(&self) -> u8 {
        self.degree
    }

    pub fn knots(&self) -> &[u8] {
        &self.knots
    }

    pub fn channel(&self) -> &SplineChannel<Quaternion> {
        &self.channel
    }

    /// Affine blend of the control points; the result is not renormalized.
    pub fn value_at(&self, frame: f32) -> Quaternion {
        self.channel.value_at(self.degree, &self.knots, frame)
    }
}

#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct TransformSample {
    pub position: [f32; 3],
    pub rotation: Quaternion,
    pub scale: [f32; 3],
}

/// All curves of one skeleton joint.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct TransformTrack {
    pub mask: TransformMask,
    pub has_spline_position: bool,
    pub has_spline_rotation: bool,
    pub has_spline_scale: bool,
    pub has_static_rotation: bool,
    pub static_position: [f32; 3],
    pub static_rotation: Quaternion,
    pub static_scale: [f32; 3],
    pub spline_position: Option<SplineTrackVector3>,
    pub spline_rotation: Option<SplineTrackQuaternion>,
    pub spline_scale: Option<SplineTrackVector3>,
}

impl Default for TransformTrack {
    fn default() -> Self {
        Self {
            mask: TransformMask::default(),
            has_spline_position: false,
            has_spline_rotation: false,
            has_spline_scale: false,
            has_static_rotation: false,
            static_position: [0.0; 3],
            static_rotation: Quaternion::IDENTITY,
            static_scale: [1.0; 3],
            spline_position: None,
            spline_rotation: None,
            spline_scale: None,
        }
    }
}

impl TransformTrack {
    pub fn position_at(&self, frame: f32) -> [f32; 3] {
        match (&self.spline_position, self.has_spline_position) {
            (Some(spline), true) => spline.value_at(frame, 0.0),
            _ => self.static_position,
        }
    }

    pub fn rotation_at(&self, frame: f32) -> Quaternion {
        match (&self.spline_rotation, self.has_spline_rotation) {
            (Some(spline), true) => spline.value_at(frame),
            _ => self.static_rotation,
        }
    }

    pub fn scale_at(&self, frame: f32) -> [f32; 3] {
        match (&self.spline_scale, self.has_spline_scale) {
            (Some(spline), true) => spline.value_at(frame, 1.0),
            _ => self.static_scale,
        }
    }

    pub fn sample(&self, frame: f32) -> TransformSample {
        TransformSample {
            position: self.position_at(frame),
            rotation: self.rotation_at(frame),
            scale: self.scale_at(frame),
        }
    }
}
