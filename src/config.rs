use std::{
    fmt, fs,
    path::{Path, PathBuf},
};

use anyhow::{bail, Context as _};
use serde::{
    de::{self, SeqAccess, Visitor},
    Deserialize,
};

use angular_gradient::{scale_request, GradientStop, RenderOptions};

#[derive(Deserialize)]
pub struct Config {
    /// Edge length of the image; in logical units when `scale` is set, pixels otherwise.
    pub size: f32,
    pub output: PathBuf,
    pub scale: Option<f32>,
    #[serde(default)]
    pub options: RenderOptions,
    #[serde(rename = "stop")]
    pub stops: Vec<Stop>,
}

impl Config {
    pub fn load<A: AsRef<Path>>(path: A) -> anyhow::Result<Self> {
        Self::load_impl(path.as_ref())
    }

    fn load_impl(path: &Path) -> anyhow::Result<Self> {
        let contents = fs::read_to_string(path)?;
        let config: Self = toml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> anyhow::Result<()> {
        match self.scale {
            // `size` is in logical units here; what matters is the scaled pixel size.
            Some(scale) => {
                if !(self.size > 0.0) {
                    bail!("`size` must be positive (found {})", self.size);
                }
                scale_request(self.size, &self.options, scale).context("invalid `scale`")?;
            }
            None => {
                if !(self.size >= 1.0) {
                    bail!("`size` must be at least 1 (found {})", self.size);
                }
            }
        }
        if self.stops.is_empty() {
            bail!("there must be at least one [[stop]]");
        }
        for (i, stop) in self.stops.iter().enumerate() {
            if !(0.0..=1.0).contains(&stop.fraction) {
                bail!("[[stop]] #{i}: `fraction` must be in range 0-1 (found {})", stop.fraction);
            }
            if !(0.0..=1.0).contains(&stop.bias) {
                bail!("[[stop]] #{i}: `bias` must be in range 0-1 (found {})", stop.bias);
            }
        }
        Ok(())
    }

    pub fn gradient(&self) -> Vec<GradientStop> {
        self.stops
            .iter()
            .map(|stop| GradientStop::with_bias(stop.color.0, stop.fraction, stop.bias))
            .collect()
    }
}

#[derive(Deserialize)]
pub struct Stop {
    pub color: Color,
    pub fraction: f32,
    #[serde(default = "default_bias")]
    pub bias: f32,
}

fn default_bias() -> f32 {
    GradientStop::DEFAULT_BIAS
}

/// Straight RGBA color, written either as `[r, g, b, a]` (0-1) or as `"#rrggbb"`/`"#rrggbbaa"`.
#[derive(Debug, PartialEq)]
pub struct Color(pub [f32; 4]);

impl Color {
    fn from_hex(s: &str) -> Option<Self> {
        let hex = s.strip_prefix('#')?;
        if !matches!(hex.len(), 6 | 8) || !hex.is_ascii() {
            return None;
        }
        let mut rgba = [1.0; 4];
        for (i, c) in rgba.iter_mut().enumerate().take(hex.len() / 2) {
            let byte = u8::from_str_radix(&hex[i * 2..i * 2 + 2], 16).ok()?;
            *c = f32::from(byte) / 255.0;
        }
        Some(Color(rgba))
    }
}

impl<'a> Deserialize<'a> for Color {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'a>,
    {
        struct ColorVisitor;

        impl<'de> Visitor<'de> for ColorVisitor {
            type Value = Color;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("an [r, g, b, a] array or a \"#rrggbb[aa]\" string")
            }

            fn visit_str<E>(self, v: &str) -> Result<Self::Value, E>
            where
                E: de::Error,
            {
                Color::from_hex(v).ok_or_else(|| E::custom(format_args!("invalid color '{v}'")))
            }

            fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
            where
                A: SeqAccess<'de>,
            {
                let mut rgba = [0.0; 4];
                for (i, c) in rgba.iter_mut().enumerate() {
                    *c = seq
                        .next_element()?
                        .ok_or_else(|| <A::Error as de::Error>::invalid_length(i, &self))?;
                }
                if seq.next_element::<f32>()?.is_some() {
                    return Err(de::Error::invalid_length(5, &self));
                }
                Ok(Color(rgba))
            }
        }

        deserializer.deserialize_any(ColorVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(s: &str) -> anyhow::Result<Config> {
        let config: Config = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    #[test]
    fn parses_example_config() {
        let config = Config::load("gradient.example.toml").unwrap();
        assert!(config.stops.len() >= 2);
    }

    #[test]
    fn parses_colors() {
        let config = parse(
            r##"
            size = 32
            output = "out.png"

            [options]
            is_clockwise = false
            outer_radius = 12.0

            [[stop]]
            color = "#ff8000"
            fraction = 0.0

            [[stop]]
            color = [0.0, 0.0, 1.0, 0.5]
            fraction = 1.0
            bias = 0.25
            "##,
        )
        .unwrap();

        assert!(!config.options.is_clockwise);
        assert!(!config.options.is_flipped);
        assert_eq!(config.options.outer_radius, 12.0);

        let stops = config.gradient();
        assert_eq!(stops[0].color, [1.0, 128.0 / 255.0, 0.0, 1.0]);
        assert_eq!(stops[0].bias, 0.5);
        assert_eq!(stops[1].color, [0.0, 0.0, 1.0, 0.5]);
        assert_eq!(stops[1].bias, 0.25);
    }

    #[test]
    fn rejects_invalid_configs() {
        let config = |head: &str, stop: &str| {
            parse(&format!(
                "output = \"a.png\"\n{head}\n[[stop]]\nfraction = 0.0\n{stop}"
            ))
        };
        config("size = 8", "color = \"#000000\"").unwrap();

        assert!(config("size = 0", "color = \"#000000\"").is_err());
        assert!(config("size = 8\nscale = 0.0", "color = \"#000000\"").is_err());
        assert!(config("size = 8", "color = \"red\"").is_err());
        assert!(config("size = 8", "color = [1.0, 0.0]").is_err());
        assert!(config("size = 8", "color = \"#000000\"\nbias = 2.0").is_err());
        assert!(parse("size = 8\noutput = \"a.png\"\nstop = []").is_err());
    }

    #[test]
    fn logical_size_is_checked_after_scaling() {
        let config = |head: &str| {
            parse(&format!(
                "output = \"a.png\"\n{head}\n[[stop]]\nfraction = 0.0\ncolor = \"#000000\""
            ))
        };
        let scaled = config("size = 0.5\nscale = 2.0").unwrap();
        assert_eq!(scaled.size, 0.5);
        assert_eq!(scaled.scale, Some(2.0));

        assert!(config("size = 0.5").is_err());
        assert!(config("size = 0.2\nscale = 2.0").is_err());
        assert!(config("size = 0.0\nscale = 2.0").is_err());
    }

    #[test]
    fn hex_colors() {
        assert_eq!(Color::from_hex("#ffffff"), Some(Color([1.0; 4])));
        assert_eq!(Color::from_hex("#00000000"), Some(Color([0.0; 4])));
        assert_eq!(Color::from_hex("ffffff"), None);
        assert_eq!(Color::from_hex("#fff"), None);
        assert_eq!(Color::from_hex("#gggggg"), None);
    }
}
