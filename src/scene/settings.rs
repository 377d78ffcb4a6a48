//! Shared `#define` settings
//!
//! Road constants live in a shader header of `#define NAME value` lines so
//! shading code and placement code agree on spacing and batch sizes. This
//! module reads those numeric defines and applies the ones the scene knows.

use std::collections::BTreeMap;

use crate::core::error::Error;
use crate::core::types::Result;
use crate::scene::config::SceneConfig;

/// Parse every `#define NAME number` in `source`.
///
/// Non-numeric defines (macros, expressions) are skipped. A later define of
/// the same name overrides an earlier one.
pub fn parse_defines(source: &str) -> BTreeMap<String, f64> {
    let mut defines = BTreeMap::new();

    for chunk in source.split("#define").skip(1) {
        // Directive must be followed by whitespace before the name
        if !chunk.starts_with(char::is_whitespace) {
            continue;
        }

        let mut tokens = chunk.split_whitespace();
        let (Some(name), Some(value)) = (tokens.next(), tokens.next()) else {
            continue;
        };
        if !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
            continue;
        }

        let numeric: String = value
            .chars()
            .take_while(|c| c.is_ascii_digit() || *c == '.')
            .collect();
        if let Ok(parsed) = numeric.parse::<f64>() {
            defines.insert(name.to_string(), parsed);
        }
    }

    defines
}

impl SceneConfig {
    /// Override recognised parameters from parsed defines.
    ///
    /// Scene keys: `drawDistance`, `nearMargin`, `evictionSlack`,
    /// `curvatureScale`, `maxCurvature`, `speed`, `cameraHeight`.
    /// Family keys: `<family>Spacing`, `<family>Offset`, `<family>BatchSize`.
    /// Other defines are shading-only and ignored. Returns how many keys
    /// were applied. The result is validated first; on error `self` is
    /// left untouched.
    pub fn apply_defines(&mut self, defines: &BTreeMap<String, f64>) -> Result<usize> {
        let mut next = self.clone();
        let applied = next.apply_defines_unchecked(defines)?;
        next.validate()?;

        *self = next;
        log::debug!("Applied {} of {} shared defines", applied, defines.len());
        Ok(applied)
    }

    fn apply_defines_unchecked(&mut self, defines: &BTreeMap<String, f64>) -> Result<usize> {
        let mut applied = 0;

        for (key, &value) in defines {
            let target = match key.as_str() {
                "drawDistance" => Some(&mut self.draw_distance),
                "nearMargin" => Some(&mut self.near_margin),
                "evictionSlack" => Some(&mut self.eviction_slack),
                "curvatureScale" => Some(&mut self.curvature_scale),
                "maxCurvature" => Some(&mut self.max_curvature),
                "speed" => Some(&mut self.speed),
                _ => None,
            };
            if let Some(field) = target {
                *field = value;
                applied += 1;
                continue;
            }
            if key == "cameraHeight" {
                self.camera.height = value as f32;
                applied += 1;
                continue;
            }

            for family in &mut self.families {
                let Some(suffix) = key.strip_prefix(family.name.as_str()) else {
                    continue;
                };
                match suffix {
                    "Spacing" => family.spacing = value,
                    "Offset" => family.offset = value,
                    "BatchSize" => family.batch_size = batch_size(key, value)?,
                    _ => continue,
                }
                applied += 1;
            }
        }

        Ok(applied)
    }
}

fn batch_size(key: &str, value: f64) -> Result<u32> {
    if value.fract() != 0.0 || !(0.0..=f64::from(u32::MAX)).contains(&value) {
        return Err(Error::InvalidConfig(format!(
            "{} must be a whole number, got {}",
            key, value
        )));
    }
    Ok(value as u32)
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str = "
        // road layout
        #define roadHalfWidth 7.5
        #define roadLaneWidth 3.5
        #define lightSpacing 60.0
        #define lightOffset 20
        #define lightBatchSize 6.0
        #define signHeight 2.5
        #define LANE_COLOR vec3(1.0, 1.0, 1.0)
        #define drawDistance 600.0
    ";

    #[test]
    fn test_parse_numeric_defines() {
        let defines = parse_defines(HEADER);
        assert_eq!(defines.get("roadHalfWidth"), Some(&7.5));
        assert_eq!(defines.get("lightOffset"), Some(&20.0));
        assert_eq!(defines.get("drawDistance"), Some(&600.0));
        assert!(!defines.contains_key("LANE_COLOR"));
        assert_eq!(defines.len(), 7);
    }

    #[test]
    fn test_parse_ignores_malformed() {
        let defines = parse_defines("#defineX 1.0\n#define\n#define lonely\n#define a-b 3");
        assert!(defines.is_empty());
    }

    #[test]
    fn test_trailing_text_after_number() {
        let defines = parse_defines("#define fogStart 250.0f // far fog");
        assert_eq!(defines.get("fogStart"), Some(&250.0));
    }

    #[test]
    fn test_apply_to_scene() {
        let mut config = SceneConfig::default();
        let applied = config.apply_defines(&parse_defines(HEADER)).unwrap();

        assert_eq!(applied, 4);
        assert_eq!(config.draw_distance, 600.0);
        let light = config.family("light").unwrap();
        assert_eq!(light.spacing, 60.0);
        assert_eq!(light.offset, 20.0);
        assert_eq!(light.batch_size, 6);
    }

    #[test]
    fn test_apply_rejects_invalid_result() {
        let mut config = SceneConfig::default();
        let defines = parse_defines("#define lightSpacing 0");
        assert!(config.apply_defines(&defines).is_err());
    }

    #[test]
    fn test_failed_apply_leaves_config_untouched() {
        let mut config = SceneConfig::default();
        let before = config.clone();

        let defines = parse_defines("#define drawDistance 500\n#define lightSpacing 0");
        assert!(config.apply_defines(&defines).is_err());
        assert_eq!(config, before);
    }

    #[test]
    fn test_fractional_batch_size_rejected() {
        let mut config = SceneConfig::default();
        let before = config.clone();

        let defines = parse_defines("#define lightBatchSize 6.7");
        assert!(matches!(config.apply_defines(&defines), Err(Error::InvalidConfig(_))));
        assert_eq!(config, before);
    }
}
