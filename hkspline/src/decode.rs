//! Block decoder for spline-compressed animation data.
//!
//! The decoder is IO-free: it operates on an in-memory byte slice. Each block stores the
//! masks of every track, then every track's payload, then padding to 16 bytes. Nothing in
//! the format is independently addressable, so decoding is a single forward pass.

use crate::{
    Axis, ByteCursor, ChannelFlags, Endian, Error, SplineTrackQuaternion, SplineTrackVector3,
    TransformMask, TransformTrack, decode_rotation,
};
use log::{debug, trace, warn};

#[derive(Copy, Clone, Debug, Eq, PartialEq, Default)]
pub struct DecodeOptions {
    pub endian: Endian,
    /// Reject masks whose flag groups are internally inconsistent instead of decoding them
    /// with spline bits taking precedence.
    pub validate_flags: bool,
}

impl DecodeOptions {
    pub fn new(endian: Endian) -> Self {
        Self {
            endian,
            ..Self::default()
        }
    }

    pub fn with_flag_validation(mut self, validate_flags: bool) -> Self {
        self.validate_flags = validate_flags;
        self
    }
}

/// Decodes `num_blocks` blocks into one array of `num_transform_tracks` tracks.
///
/// Tracks persist across blocks: each block replaces the masks, flags and spline curves
/// and overwrites the static components it encodes.
pub fn decode(
    buffer: &[u8],
    is_big_endian: bool,
    num_transform_tracks: usize,
    num_blocks: usize,
) -> Result<Vec<TransformTrack>, Error> {
    let options = DecodeOptions::new(Endian::from_big_endian_flag(is_big_endian));
    decode_with_options(buffer, num_transform_tracks, num_blocks, &options)
}

pub fn decode_with_options(
    buffer: &[u8],
    num_transform_tracks: usize,
    num_blocks: usize,
    options: &DecodeOptions,
) -> Result<Vec<TransformTrack>, Error> {
    debug!(
        "decoding {num_blocks} block(s) x {num_transform_tracks} track(s) from {} bytes ({:?})",
        buffer.len(),
        options.endian
    );
    let mut cursor = ByteCursor::new(buffer, options.endian);
    let mut tracks = vec![TransformTrack::default(); num_transform_tracks];
    for block in 0..num_blocks {
        decode_block(&mut cursor, &mut tracks, block, options)?;
    }
    debug!("decode finished at offset {:#x}", cursor.position());
    Ok(tracks)
}

/// Decodes every block into its own fresh set of tracks.
pub fn decode_blocks(
    buffer: &[u8],
    num_transform_tracks: usize,
    num_blocks: usize,
    options: &DecodeOptions,
) -> Result<Vec<Vec<TransformTrack>>, Error> {
    let mut cursor = ByteCursor::new(buffer, options.endian);
    let mut blocks = Vec::with_capacity(num_blocks);
    for block in 0..num_blocks {
        let mut tracks = vec![TransformTrack::default(); num_transform_tracks];
        decode_block(&mut cursor, &mut tracks, block, options)?;
        blocks.push(tracks);
    }
    Ok(blocks)
}

pub fn decode_block(
    cursor: &mut ByteCursor<'_>,
    tracks: &mut [TransformTrack],
    block: usize,
    options: &DecodeOptions,
) -> Result<(), Error> {
    debug!("block {block} @{:#x}", cursor.position());

    for (i, track) in tracks.iter_mut().enumerate() {
        let offset = cursor.position();
        let mask = TransformMask::read(cursor)?;
        trace!(
            "mask[{i}]@{offset:#x}: quant={:#010b} pos={:#010b} rot={:#010b} scale={:#010b}",
            mask.quantization_bits(),
            mask.position.bits(),
            mask.rotation.bits(),
            mask.scale.bits()
        );
        if options.validate_flags {
            mask.validate()?;
        } else if let Err(e) = mask.validate() {
            warn!("track {i} in block {block}: {e}");
        }
        track.mask = mask;
    }
    cursor.pad(4);

    for (i, track) in tracks.iter_mut().enumerate() {
        trace!("track[{i}] payload @{:#x}", cursor.position());
        read_track_payload(cursor, track)?;
    }
    cursor.pad(16);

    Ok(())
}

fn read_track_payload(cursor: &mut ByteCursor<'_>, track: &mut TransformTrack) -> Result<(), Error> {
    let mask = track.mask;

    track.has_spline_position = mask.position.any_spline_xyz();
    track.has_spline_rotation = mask.rotation.any_spline();
    track.has_static_rotation = mask.rotation.any_static();
    track.has_spline_scale = mask.scale.any_spline_xyz();

    track.spline_position = if track.has_spline_position {
        Some(SplineTrackVector3::read(
            cursor,
            mask.position,
            mask.position_quantization()?,
        )?)
    } else {
        read_static_vector(cursor, mask.position, &mut track.static_position)?;
        None
    };
    cursor.pad(4);

    track.spline_rotation = if track.has_spline_rotation {
        Some(SplineTrackQuaternion::read(
            cursor,
            mask.rotation_quantization()?,
        )?)
    } else {
        if track.has_static_rotation {
            let quantization = mask.rotation_quantization()?;
            cursor.pad(quantization.align());
            track.static_rotation = decode_rotation(cursor, quantization)?;
        }
        None
    };
    cursor.pad(4);

    track.spline_scale = if track.has_spline_scale {
        Some(SplineTrackVector3::read(
            cursor,
            mask.scale,
            mask.scale_quantization()?,
        )?)
    } else {
        read_static_vector(cursor, mask.scale, &mut track.static_scale)?;
        None
    };
    cursor.pad(4);

    Ok(())
}

// Axes without a static flag keep their current value.
fn read_static_vector(
    cursor: &mut ByteCursor<'_>,
    flags: ChannelFlags,
    out: &mut [f32; 3],
) -> Result<(), Error> {
    for (i, axis) in Axis::XYZ.into_iter().enumerate() {
        if flags.is_static(axis) {
            out[i] = cursor.read_f32()?;
        }
    }
    Ok(())
}
