use hkspline::{DecodeOptions, Endian, TransformTrack, decode_with_options};
use serde_json::json;
use std::path::PathBuf;

fn usage() -> ! {
    eprintln!(
        "usage: track_dump <block.bin> --tracks N [--blocks N] [--big-endian] [--strict] [--frame F]... [--raw]"
    );
    std::process::exit(2);
}

fn parse<T: std::str::FromStr>(flag: &str, value: Option<&String>) -> T {
    value.and_then(|v| v.parse().ok()).unwrap_or_else(|| {
        eprintln!("{flag} needs a value");
        usage()
    })
}

fn main() {
    env_logger::init();

    let args = std::env::args().skip(1).collect::<Vec<_>>();
    let mut positional = Vec::<String>::new();
    let mut tracks: Option<usize> = None;
    let mut blocks = 1usize;
    let mut endian = Endian::Little;
    let mut strict = false;
    let mut raw = false;
    let mut frames = Vec::<f32>::new();

    let mut i = 0usize;
    while i < args.len() {
        match args[i].as_str() {
            "--tracks" => {
                tracks = Some(parse("--tracks", args.get(i + 1)));
                i += 2;
            }
            "--blocks" => {
                blocks = parse("--blocks", args.get(i + 1));
                i += 2;
            }
            "--frame" => {
                frames.push(parse("--frame", args.get(i + 1)));
                i += 2;
            }
            "--big-endian" => {
                endian = Endian::Big;
                i += 1;
            }
            "--strict" => {
                strict = true;
                i += 1;
            }
            "--raw" => {
                raw = true;
                i += 1;
            }
            "-h" | "--help" => usage(),
            other => {
                positional.push(other.to_string());
                i += 1;
            }
        }
    }

    let Some(path) = positional.first().map(PathBuf::from) else {
        usage()
    };
    let Some(num_tracks) = tracks else { usage() };
    if frames.is_empty() {
        frames.push(0.0);
    }

    let bytes = std::fs::read(&path).expect("read block buffer");
    let options = DecodeOptions::new(endian).with_flag_validation(strict);
    let decoded: Vec<TransformTrack> =
        decode_with_options(&bytes, num_tracks, blocks, &options).expect("decode blocks");

    let out: Vec<_> = decoded
        .iter()
        .enumerate()
        .map(|(i, track)| {
            let samples: Vec<_> = frames
                .iter()
                .map(|&frame| json!({"frame": frame, "transform": track.sample(frame)}))
                .collect();
            let mut entry = json!({
                "i": i,
                "splinePosition": track.has_spline_position,
                "splineRotation": track.has_spline_rotation,
                "staticRotation": track.has_static_rotation,
                "splineScale": track.has_spline_scale,
                "samples": samples,
            });
            if raw {
                entry["track"] = json!(track);
            }
            entry
        })
        .collect();

    let report = json!({
        "path": path.display().to_string(),
        "bytes": bytes.len(),
        "blocks": blocks,
        "tracks": out,
    });
    println!(
        "{}",
        serde_json::to_string_pretty(&report).expect("serialize report")
    );
}
