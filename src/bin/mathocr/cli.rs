//! File-level normalization for the command line.

use mathocr::core::{ConfigValidator, OCRError, OcrResult};
use mathocr::pipeline::{NormalizationOutput, NormalizerConfig, normalize_with_report};
use mathocr::processors::ForegroundDetection;
use mathocr::utils::{load_images, save_gray_image};
use rayon::prelude::*;
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{error, info, warn};

/// Values given on the command line that replace configuration fields.
#[derive(Debug, Default, Clone, Copy)]
pub struct ConfigOverrides {
    pub target_height: Option<u32>,
    pub block_size: Option<u32>,
    pub constant: Option<i32>,
    pub kernel: Option<u32>,
    pub sigma: Option<f32>,
}

/// One line of `--report` output.
#[derive(Debug, Serialize)]
struct ImageReport<'a> {
    input: &'a Path,
    output: &'a Path,
    width: u32,
    height: u32,
    detection: Option<ForegroundDetection>,
    fallback_used: bool,
}

/// Loads the base configuration and applies the overrides.
pub fn build_config(
    path: Option<&Path>,
    overrides: &ConfigOverrides,
) -> OcrResult<NormalizerConfig> {
    let mut config = match path {
        Some(path) => NormalizerConfig::from_file(path)?,
        None => NormalizerConfig::default(),
    };

    if let Some(height) = overrides.target_height {
        config.target_height = height;
    }
    if let Some(block_size) = overrides.block_size {
        config.binarize_block_size = block_size;
    }
    if let Some(constant) = overrides.constant {
        config.binarize_constant = constant;
    }
    if let Some(kernel) = overrides.kernel {
        config.smoothing_kernel = kernel;
    }
    if let Some(sigma) = overrides.sigma {
        config.smoothing_sigma = sigma;
    }

    config.validate()?;
    Ok(config)
}

/// Where the normalized version of `input` is written.
pub fn output_path(input: &Path, output_dir: Option<&Path>) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "image".to_string());
    let file_name = format!("{stem}_normalized.png");
    match output_dir {
        Some(dir) => dir.join(file_name),
        None => input.with_file_name(file_name),
    }
}

fn save_output(
    input: &Path,
    target: &Path,
    output: &NormalizationOutput,
    report: bool,
) -> OcrResult<()> {
    save_gray_image(&output.image, target)?;

    match &output.detection {
        Some(detection) => info!(
            "{}: region {:?}, skew {:.2} deg -> {}x{} ({})",
            input.display(),
            detection.region,
            detection.skew_angle,
            output.image.width(),
            output.image.height(),
            target.display()
        ),
        None => info!(
            "{}: no foreground found -> {}x{} ({})",
            input.display(),
            output.image.width(),
            output.image.height(),
            target.display()
        ),
    }
    if output.fallback_used {
        warn!("{}: empty crop, wrote a blank image", input.display());
    }

    if report {
        let line = ImageReport {
            input,
            output: target,
            width: output.image.width(),
            height: output.image.height(),
            detection: output.detection,
            fallback_used: output.fallback_used,
        };
        println!("{}", serde_json::to_string(&line)?);
    }
    Ok(())
}

/// Normalizes every readable input and saves the results.
///
/// Unreadable inputs and failed normalizations are logged and skipped.
///
/// # Returns
///
/// The number of images written, or an error if none could be.
pub fn normalize_files(
    inputs: &[PathBuf],
    output_dir: Option<&Path>,
    config: &NormalizerConfig,
    report: bool,
) -> OcrResult<usize> {
    let start = Instant::now();

    if let Some(dir) = output_dir {
        std::fs::create_dir_all(dir)?;
    }

    let loaded: Vec<_> = inputs
        .iter()
        .zip(load_images(inputs))
        .filter_map(|(path, result)| match result {
            Ok(image) => Some((path, image)),
            Err(err) => {
                warn!("Skipping {}: {}", path.display(), err);
                None
            }
        })
        .collect();

    let outcomes: Vec<_> = loaded
        .par_iter()
        .map(|(path, image)| (*path, normalize_with_report(image, config)))
        .collect();

    let mut written = 0;
    for (path, outcome) in outcomes {
        let result = outcome.and_then(|output| {
            save_output(path, &output_path(path, output_dir), &output, report)
        });
        match result {
            Ok(()) => written += 1,
            Err(err) => error!("Failed to normalize {}: {}", path.display(), err),
        }
    }

    info!(
        "Normalized {} of {} images in {:.2}ms",
        written,
        inputs.len(),
        start.elapsed().as_secs_f64() * 1000.0
    );

    if written == 0 {
        return Err(OCRError::invalid_input("no input image could be normalized"));
    }
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage};

    #[test]
    fn test_output_path() {
        assert_eq!(
            output_path(Path::new("/data/scan.jpg"), None),
            PathBuf::from("/data/scan_normalized.png")
        );
        assert_eq!(
            output_path(Path::new("/data/scan.jpg"), Some(Path::new("/out"))),
            PathBuf::from("/out/scan_normalized.png")
        );
    }

    #[test]
    fn test_build_config_overrides() {
        let overrides = ConfigOverrides {
            target_height: Some(32),
            constant: Some(-3),
            ..Default::default()
        };
        let config = build_config(None, &overrides).unwrap();
        assert_eq!(config.target_height, 32);
        assert_eq!(config.binarize_constant, -3);
        assert_eq!(config.binarize_block_size, 15);

        let bad = ConfigOverrides {
            block_size: Some(8),
            ..Default::default()
        };
        assert!(matches!(
            build_config(None, &bad),
            Err(OCRError::Config(_))
        ));
    }

    #[test]
    fn test_normalize_files_skips_missing() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("page.png");
        let mut page = RgbImage::from_pixel(200, 120, Rgb([240, 240, 240]));
        for y in 50..70 {
            for x in 40..160 {
                page.put_pixel(x, y, Rgb([10, 10, 10]));
            }
        }
        page.save(&input).unwrap();

        let out_dir = dir.path().join("out");
        let inputs = vec![input, dir.path().join("missing.png")];
        let config = NormalizerConfig::default();
        let written = normalize_files(&inputs, Some(&out_dir), &config, false).unwrap();
        assert_eq!(written, 1);

        let saved = image::open(out_dir.join("page_normalized.png")).unwrap();
        assert_eq!(saved.height(), 64);
    }

    #[test]
    fn test_normalize_files_fails_when_nothing_written() {
        let dir = tempfile::tempdir().unwrap();
        let inputs = vec![dir.path().join("missing.png")];
        assert!(normalize_files(&inputs, None, &NormalizerConfig::default(), false).is_err());
    }
}
