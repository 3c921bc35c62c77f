//! Sanity checks on written sprite files
//!
//! Decodes a generated image and checks format, dimensions and
//! transparency. Pixel data is never modified.

use serde::{Deserialize, Serialize};
use spriteforge_core::{Result, SpriteError};
use std::path::Path;

/// A single validation check result
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationCheck {
    pub name: String,
    pub status: CheckStatus,
    pub detail: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CheckStatus {
    Pass,
    Warn,
    Fail,
}

/// Validation report for one image file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationReport {
    pub path: String,
    pub format: String,
    pub width: u32,
    pub height: u32,
    pub checks: Vec<ValidationCheck>,
    pub passed: bool,
}

impl ValidationReport {
    pub fn count_by_status(&self, status: CheckStatus) -> usize {
        self.checks.iter().filter(|c| c.status == status).count()
    }

    pub fn print_summary(&self) {
        println!("Validation: {}", self.path);
        println!("  Format: {}, Size: {}x{}", self.format, self.width, self.height);
        for check in &self.checks {
            let icon = match check.status {
                CheckStatus::Pass => "OK",
                CheckStatus::Warn => "WARN",
                CheckStatus::Fail => "FAIL",
            };
            println!("  {}: {}  {}", check.name, check.detail, icon);
        }
        if self.passed {
            println!("  Result: PASSED");
        } else {
            println!(
                "  Result: FAILED ({} issues)",
                self.count_by_status(CheckStatus::Fail)
            );
        }
    }
}

fn check(name: &str, status: CheckStatus, detail: String) -> ValidationCheck {
    ValidationCheck {
        name: name.to_string(),
        status,
        detail,
    }
}

/// Validate a sprite image. With `expected_size`, a square image of that
/// edge passes and a sheet whose sides are multiples of it warns.
pub fn validate_image(path: &Path, expected_size: Option<u32>) -> Result<ValidationReport> {
    let reader = image::ImageReader::open(path)?.with_guessed_format()?;
    let format = reader
        .format()
        .map(|f| format!("{:?}", f).to_uppercase())
        .unwrap_or_else(|| "unknown".to_string());
    let img = reader.decode().map_err(|e| {
        SpriteError::ValidationError(format!("Failed to decode {}: {}", path.display(), e))
    })?;

    let (width, height) = (img.width(), img.height());
    let mut checks = Vec::new();

    checks.push(if format == "PNG" {
        check("Format", CheckStatus::Pass, format.clone())
    } else {
        check("Format", CheckStatus::Warn, format!("{} (expected PNG)", format))
    });

    match expected_size {
        Some(size) if width == size && height == size => {
            checks.push(check("Dimensions", CheckStatus::Pass, format!("{}x{}", width, height)));
        }
        Some(size) if size > 0 && width % size == 0 && height % size == 0 => {
            checks.push(check(
                "Dimensions",
                CheckStatus::Warn,
                format!("{}x{} ({}x{} frames of {})", width, height, width / size, height / size, size),
            ));
        }
        Some(size) => {
            checks.push(check(
                "Dimensions",
                CheckStatus::Fail,
                format!("{}x{}, expected {}x{}", width, height, size, size),
            ));
        }
        None => {
            checks.push(check("Dimensions", CheckStatus::Pass, format!("{}x{}", width, height)));
        }
    }

    if img.color().has_alpha() {
        let rgba = img.to_rgba8();
        let total = (rgba.width() * rgba.height()) as usize;
        let transparent = rgba.pixels().filter(|p| p.0[3] == 0).count();

        if total > 0 && transparent == total {
            checks.push(check("Content", CheckStatus::Fail, "fully transparent".to_string()));
        } else if transparent == 0 {
            checks.push(check(
                "Transparency",
                CheckStatus::Warn,
                "alpha channel present but fully opaque".to_string(),
            ));
        } else {
            checks.push(check(
                "Transparency",
                CheckStatus::Pass,
                format!("{:.0}% transparent", transparent as f64 * 100.0 / total as f64),
            ));
        }
    } else {
        checks.push(check("Transparency", CheckStatus::Warn, "no alpha channel".to_string()));
    }

    let passed = !checks.iter().any(|c| c.status == CheckStatus::Fail);

    Ok(ValidationReport {
        path: path.to_string_lossy().to_string(),
        format,
        width,
        height,
        checks,
        passed,
    })
}
