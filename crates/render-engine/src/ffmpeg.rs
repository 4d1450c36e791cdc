//! ffmpeg command-line generation and process plumbing.
//!
//! Every `*_args` function is pure so the exact invocations can be tested
//! without ffmpeg installed.

use std::path::Path;
use std::process::{Command, Stdio};

use cutline_common::error::{CutlineError, CutlineResult};
use cutline_timeline::{Crop, VideoParams};

use crate::export::{ExportFormat, ExportSettings};
use crate::plan::{ClipSegment, MixEntry};

fn base_args() -> Vec<String> {
    vec![
        "-y".to_string(),
        "-hide_banner".to_string(),
        "-loglevel".to_string(),
        "error".to_string(),
        "-nostats".to_string(),
    ]
}

/// Black frames of `duration` seconds at the output size.
pub fn black_segment_args(duration: f64, settings: &ExportSettings, output: &Path) -> Vec<String> {
    let mut args = base_args();
    args.extend([
        "-f".to_string(),
        "lavfi".to_string(),
        "-i".to_string(),
        black_source(settings, duration),
        "-t".to_string(),
        secs(duration),
    ]);
    args.append(&mut video_codec_args(settings));
    args.push("-an".to_string());
    args.push(output.display().to_string());
    args
}

/// One trimmed source window placed on a black canvas.
pub fn clip_segment_args(
    segment: &ClipSegment,
    settings: &ExportSettings,
    output: &Path,
) -> Vec<String> {
    let mut args = base_args();
    args.extend([
        "-ss".to_string(),
        secs(segment.trim_start),
        "-i".to_string(),
        segment.source.clone(),
        "-f".to_string(),
        "lavfi".to_string(),
        "-i".to_string(),
        black_source(settings, segment.duration),
        "-filter_complex".to_string(),
        clip_filter(&segment.video, settings),
        "-map".to_string(),
        "[vout]".to_string(),
        "-t".to_string(),
        secs(segment.duration),
        "-r".to_string(),
        settings.fps.to_string(),
    ]);
    args.append(&mut video_codec_args(settings));
    args.push("-an".to_string());
    args.push(output.display().to_string());
    args
}

/// Crop, fit, scale, and position input 0 over the canvas on input 1.
pub fn clip_filter(video: &VideoParams, settings: &ExportSettings) -> String {
    let mut chain = Vec::new();
    if let Some(crop) = crop_filter(&video.crop) {
        chain.push(crop);
    }
    chain.push(format!(
        "scale={}:{}:force_original_aspect_ratio=decrease",
        settings.width, settings.height
    ));
    if (video.scale - 1.0).abs() > 1e-9 {
        chain.push(format!(
            "scale=trunc(iw*{s:.4}/2)*2:trunc(ih*{s:.4}/2)*2",
            s = video.scale
        ));
    }
    chain.push("setsar=1".to_string());

    format!(
        "[0:v]{}[fg];[1:v][fg]overlay=x=(W-w)/2{}:y=(H-h)/2{}:shortest=1,format=yuv420p[vout]",
        chain.join(","),
        offset_term("W", video.position.x),
        offset_term("H", video.position.y),
    )
}

fn crop_filter(crop: &Crop) -> Option<String> {
    if crop.is_full() {
        return None;
    }
    Some(format!(
        "crop=iw*{:.4}:ih*{:.4}:iw*{:.4}:ih*{:.4}",
        crop.width / 100.0,
        crop.height / 100.0,
        crop.x / 100.0,
        crop.y / 100.0
    ))
}

/// `+W*0.1000` / `-W*0.1000` for a percent offset; empty at zero.
fn offset_term(axis: &str, percent: f64) -> String {
    if percent.abs() < 1e-9 {
        return String::new();
    }
    let sign = if percent < 0.0 { '-' } else { '+' };
    format!("{sign}{axis}*{:.4}", percent.abs() / 100.0)
}

/// Trim, delay, and scale every entry, then sum them into one stream.
pub fn mix_args(entries: &[MixEntry], output: &Path) -> Vec<String> {
    let mut args = base_args();
    for entry in entries {
        args.extend([
            "-ss".to_string(),
            secs(entry.trim_start),
            "-t".to_string(),
            secs(entry.duration),
            "-i".to_string(),
            entry.source.clone(),
        ]);
    }
    args.extend([
        "-filter_complex".to_string(),
        mix_filter(entries),
        "-map".to_string(),
        "[aout]".to_string(),
        "-c:a".to_string(),
        "pcm_s16le".to_string(),
        output.display().to_string(),
    ]);
    args
}

pub fn mix_filter(entries: &[MixEntry]) -> String {
    let mut parts: Vec<String> = entries
        .iter()
        .enumerate()
        .map(|(index, entry)| {
            let delay_ms = (entry.delay * 1000.0).round().max(0.0) as u64;
            format!(
                "[{index}:a]adelay={delay_ms}|{delay_ms},volume={:.4}[a{index}]",
                entry.volume
            )
        })
        .collect();
    let labels: String = (0..entries.len()).map(|index| format!("[a{index}]")).collect();
    parts.push(format!(
        "{labels}amix=inputs={}:duration=longest:dropout_transition=0:normalize=0[aout]",
        entries.len()
    ));
    parts.join(";")
}

/// Concatenate the segment list, muxing in the mixed audio when present.
pub fn mux_args(
    concat_list: &Path,
    audio: Option<&Path>,
    settings: &ExportSettings,
    output: &Path,
) -> Vec<String> {
    let mut args = base_args();
    args.extend([
        "-f".to_string(),
        "concat".to_string(),
        "-safe".to_string(),
        "0".to_string(),
        "-i".to_string(),
        concat_list.display().to_string(),
    ]);

    match audio {
        Some(audio) => {
            args.extend([
                "-i".to_string(),
                audio.display().to_string(),
                "-map".to_string(),
                "0:v".to_string(),
                "-map".to_string(),
                "1:a".to_string(),
                "-c:v".to_string(),
                "copy".to_string(),
            ]);
            args.append(&mut audio_codec_args(settings));
        }
        None => args.extend(["-c".to_string(), "copy".to_string()]),
    }

    if settings.format == ExportFormat::Mp4H264 {
        args.extend(["-movflags".to_string(), "+faststart".to_string()]);
    }
    args.push(output.display().to_string());
    args
}

/// Contents of the concat demuxer list for `segments`.
pub fn concat_list<P: AsRef<Path>>(segments: &[P]) -> String {
    segments
        .iter()
        .map(|path| {
            let escaped = path.as_ref().display().to_string().replace('\'', "'\\''");
            format!("file '{escaped}'\n")
        })
        .collect()
}

fn video_codec_args(settings: &ExportSettings) -> Vec<String> {
    let mut args = match settings.format {
        ExportFormat::Mp4H264 => vec![
            "-c:v".to_string(),
            "libx264".to_string(),
            "-preset".to_string(),
            settings.preset.clone(),
            "-pix_fmt".to_string(),
            "yuv420p".to_string(),
        ],
        ExportFormat::Webm => vec![
            "-c:v".to_string(),
            "libvpx-vp9".to_string(),
            "-pix_fmt".to_string(),
            "yuv420p".to_string(),
        ],
    };

    match (settings.format, settings.video_bitrate_kbps) {
        (ExportFormat::Webm, 0) => args.extend([
            "-crf".to_string(),
            "32".to_string(),
            "-b:v".to_string(),
            "0".to_string(),
        ]),
        (_, 0) => {}
        (_, kbps) => args.extend(["-b:v".to_string(), format!("{kbps}k")]),
    }
    args
}

fn audio_codec_args(settings: &ExportSettings) -> Vec<String> {
    let codec = match settings.format {
        ExportFormat::Mp4H264 => "aac",
        ExportFormat::Webm => "libopus",
    };
    vec![
        "-c:a".to_string(),
        codec.to_string(),
        "-b:a".to_string(),
        format!("{}k", settings.audio_bitrate_kbps.max(64)),
    ]
}

fn black_source(settings: &ExportSettings, duration: f64) -> String {
    format!(
        "color=c=black:s={}x{}:r={}:d={}",
        settings.width,
        settings.height,
        settings.fps,
        secs(duration)
    )
}

fn secs(value: f64) -> String {
    format!("{value:.6}")
}

/// Run ffmpeg to completion, returning stderr in the error on failure.
pub fn run_ffmpeg(args: &[String], label: &str) -> CutlineResult<()> {
    tracing::debug!(label, args = ?args, "Running ffmpeg");
    let started = std::time::Instant::now();

    let output = Command::new("ffmpeg")
        .args(args)
        .stdin(Stdio::null())
        .output()
        .map_err(|e| CutlineError::render(format!("Failed to start ffmpeg: {e}")))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(CutlineError::render(format!(
            "ffmpeg {label} failed (status {}): {}",
            output.status,
            stderr.trim()
        )));
    }

    tracing::debug!(
        label,
        elapsed_ms = started.elapsed().as_millis(),
        "ffmpeg finished"
    );
    Ok(())
}

/// Whether `binary` resolves on `PATH`.
pub fn command_exists(binary: &str) -> bool {
    Command::new("sh")
        .arg("-c")
        .arg(format!("command -v {binary} >/dev/null 2>&1"))
        .status()
        .map(|status| status.success())
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use cutline_timeline::{ClipId, Position};
    use std::path::PathBuf;

    fn segment(video: VideoParams) -> ClipSegment {
        ClipSegment {
            clip_id: ClipId(3),
            track_index: 0,
            source: "media/a.mp4".to_string(),
            start: 2.0,
            duration: 3.0,
            trim_start: 1.5,
            trim_end: 4.5,
            video,
        }
    }

    #[test]
    fn test_black_segment_uses_lavfi_color() {
        let args = black_segment_args(2.5, &ExportSettings::default(), &PathBuf::from("black_0.mp4"));
        assert!(args.contains(&"color=c=black:s=1280x720:r=30:d=2.500000".to_string()));
        assert!(args.contains(&"-an".to_string()));
        assert_eq!(args.last().map(String::as_str), Some("black_0.mp4"));
    }

    #[test]
    fn test_clip_segment_seeks_then_limits_duration() {
        let args = clip_segment_args(
            &segment(VideoParams::default()),
            &ExportSettings::default(),
            &PathBuf::from("section_1.mp4"),
        );
        let ss = args.iter().position(|a| a == "-ss").unwrap();
        assert_eq!(args[ss + 1], "1.500000");
        assert_eq!(args[ss + 2], "-i");
        assert_eq!(args[ss + 3], "media/a.mp4");
        let t = args.iter().position(|a| a == "-t").unwrap();
        assert_eq!(args[t + 1], "3.000000");
        assert!(args.contains(&"libx264".to_string()));
        assert!(args.contains(&"ultrafast".to_string()));
    }

    #[test]
    fn test_default_clip_filter_only_fits_and_centers() {
        let filter = clip_filter(&VideoParams::default(), &ExportSettings::default());
        assert_eq!(
            filter,
            "[0:v]scale=1280:720:force_original_aspect_ratio=decrease,setsar=1[fg];\
             [1:v][fg]overlay=x=(W-w)/2:y=(H-h)/2:shortest=1,format=yuv420p[vout]"
        );
    }

    #[test]
    fn test_clip_filter_applies_crop_scale_position() {
        let video = VideoParams {
            crop: Crop::new(10.0, 20.0, 50.0, 40.0),
            scale: 0.5,
            position: Position::new(-10.0, 25.0),
        };
        let filter = clip_filter(&video, &ExportSettings::default());
        assert!(filter.contains("crop=iw*0.5000:ih*0.4000:iw*0.1000:ih*0.2000"));
        assert!(filter.contains("scale=trunc(iw*0.5000/2)*2:trunc(ih*0.5000/2)*2"));
        assert!(filter.contains("x=(W-w)/2-W*0.1000"));
        assert!(filter.contains("y=(H-h)/2+H*0.2500"));
    }

    #[test]
    fn test_mix_filter_delays_scales_and_sums() {
        let entries = vec![
            MixEntry {
                clip_id: ClipId(1),
                source: "music.mp3".to_string(),
                trim_start: 0.0,
                duration: 8.0,
                delay: 1.25,
                volume: 0.5,
            },
            MixEntry {
                clip_id: ClipId(2),
                source: "voice.wav".to_string(),
                trim_start: 2.0,
                duration: 3.0,
                delay: 0.0,
                volume: 1.0,
            },
        ];
        assert_eq!(
            mix_filter(&entries),
            "[0:a]adelay=1250|1250,volume=0.5000[a0];\
             [1:a]adelay=0|0,volume=1.0000[a1];\
             [a0][a1]amix=inputs=2:duration=longest:dropout_transition=0:normalize=0[aout]"
        );

        let args = mix_args(&entries, &PathBuf::from("mixed_audio.wav"));
        assert_eq!(args.iter().filter(|a| *a == "-i").count(), 2);
        assert!(args.contains(&"pcm_s16le".to_string()));
    }

    #[test]
    fn test_mux_copies_video_and_encodes_audio() {
        let settings = ExportSettings::default();
        let with_audio = mux_args(
            Path::new("concat_list.txt"),
            Some(Path::new("mixed_audio.wav")),
            &settings,
            Path::new("out.mp4"),
        );
        assert!(with_audio.windows(2).any(|w| w == ["-c:v", "copy"]));
        assert!(with_audio.windows(2).any(|w| w == ["-c:a", "aac"]));

        let silent = mux_args(Path::new("concat_list.txt"), None, &settings, Path::new("out.mp4"));
        assert!(silent.windows(2).any(|w| w == ["-c", "copy"]));
        assert!(!silent.contains(&"-c:a".to_string()));
    }

    #[test]
    fn test_webm_uses_vp9_and_opus() {
        let settings = ExportSettings {
            format: ExportFormat::Webm,
            ..ExportSettings::default()
        };
        let args = black_segment_args(1.0, &settings, Path::new("black.webm"));
        assert!(args.contains(&"libvpx-vp9".to_string()));
        let mux = mux_args(Path::new("l.txt"), Some(Path::new("a.wav")), &settings, Path::new("o.webm"));
        assert!(mux.contains(&"libopus".to_string()));
        assert!(!mux.contains(&"+faststart".to_string()));
    }

    #[test]
    fn test_concat_list_escapes_quotes() {
        let list = concat_list(&[PathBuf::from("/tmp/a.mp4"), PathBuf::from("/tmp/it's.mp4")]);
        assert_eq!(list, "file '/tmp/a.mp4'\nfile '/tmp/it'\\''s.mp4'\n");
    }
}
