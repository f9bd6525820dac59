use crate::types::*;
use std::path::PathBuf;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// One input asset of a job
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(default))]
pub struct InputSpec {
    pub path: PathBuf,
    /// 1-based page selection: "1-3,5", "all", "*"
    pub pages: String,
    /// Which source box supplies the content region of a vector page
    pub pdf_box: PdfBoxKind,
}

impl Default for InputSpec {
    fn default() -> Self {
        Self {
            path: PathBuf::new(),
            pages: "all".to_string(),
            pdf_box: PdfBoxKind::Auto,
        }
    }
}

impl InputSpec {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            ..Default::default()
        }
    }
}

/// Output location
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(default))]
pub struct OutputSpec {
    pub dir: PathBuf,
    pub basename: String,
}

impl Default for OutputSpec {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("."),
            basename: "output".to_string(),
        }
    }
}

/// Complete description of a composition job
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(default))]
pub struct JobOptions {
    pub inputs: Vec<InputSpec>,
    pub trim: TrimSize,
    pub bleed: BleedSpec,
    pub fit_mode: FitMode,
    pub anchor: Anchor,
    pub bleed_generator: BleedGenerator,
    pub crop_marks: bool,
    pub output: OutputSpec,
    /// Also serialize the resolved job next to the output as `<basename>.job.json`
    pub emit_job: bool,
}

impl Default for JobOptions {
    fn default() -> Self {
        Self {
            inputs: Vec::new(),
            trim: TrimSize::new(Length::inches(4.0), Length::inches(6.0)),
            bleed: BleedSpec::uniform(Length::inches(0.125)),
            fit_mode: FitMode::default(),
            anchor: Anchor::default(),
            bleed_generator: BleedGenerator::default(),
            crop_marks: false,
            output: OutputSpec::default(),
            emit_job: false,
        }
    }
}

impl JobOptions {
    /// Load a job description from JSON, validating it eagerly
    #[cfg(feature = "serde")]
    pub async fn load(path: impl AsRef<std::path::Path>) -> Result<Self> {
        let bytes = tokio::fs::read(path).await?;
        let options: Self = serde_json::from_slice(&bytes)
            .map_err(|e| BleedError::Config(format!("Failed to parse job: {}", e)))?;
        options.validate()?;
        Ok(options)
    }

    /// Save the job description to JSON
    #[cfg(feature = "serde")]
    pub async fn save(&self, path: impl AsRef<std::path::Path>) -> Result<()> {
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| BleedError::Config(format!("Failed to serialize job: {}", e)))?;
        tokio::fs::write(path, json).await?;
        Ok(())
    }

    /// Validate the job description
    pub fn validate(&self) -> Result<()> {
        if self.inputs.is_empty() {
            return Err(BleedError::Config("No inputs specified".to_string()));
        }
        for input in &self.inputs {
            if input.path.as_os_str().is_empty() {
                return Err(BleedError::Config("Input with empty path".to_string()));
            }
        }

        self.trim.width_pt()?;
        self.trim.height_pt()?;
        self.bleed.top_pt()?;
        self.bleed.right_pt()?;
        self.bleed.bottom_pt()?;
        self.bleed.left_pt()?;

        if self.output.basename.trim().is_empty() {
            return Err(BleedError::Config("Output basename is empty".to_string()));
        }

        Ok(())
    }
}

/// Parse a trim-size expression like "4x6in" or "101.6x152.4mm".
///
/// The unit suffix is optional and defaults to inches.
pub fn parse_size(spec: &str) -> Result<TrimSize> {
    let spec = spec.trim();
    let (w_part, rest) = spec
        .split_once(['x', 'X'])
        .ok_or_else(|| BleedError::Config(format!("Invalid size format: {}", spec)))?;

    let unit_at = rest
        .find(|c: char| c.is_ascii_alphabetic())
        .unwrap_or(rest.len());
    let (h_part, unit_part) = rest.split_at(unit_at);

    let width: f32 = w_part
        .trim()
        .parse()
        .map_err(|_| BleedError::Config(format!("Invalid size format: {}", spec)))?;
    let height: f32 = h_part
        .trim()
        .parse()
        .map_err(|_| BleedError::Config(format!("Invalid size format: {}", spec)))?;

    let unit = Unit::parse(unit_part);
    Ok(TrimSize::new(
        Length::new(width, unit),
        Length::new(height, unit),
    ))
}

/// Parse a bleed expression: one value for all sides, or "t,r,b,l".
pub fn parse_bleed(spec: &str, unit: Unit) -> Result<BleedSpec> {
    let values: Vec<f32> = spec
        .split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(|part| {
            part.parse::<f32>()
                .map_err(|_| BleedError::Config(format!("Invalid bleed value: {}", part)))
        })
        .collect::<Result<_>>()?;

    match values.as_slice() {
        [v] => Ok(BleedSpec::uniform(Length::new(*v, unit))),
        [t, r, b, l] => Ok(BleedSpec::new(
            Length::new(*t, unit),
            Length::new(*r, unit),
            Length::new(*b, unit),
            Length::new(*l, unit),
        )),
        _ => Err(BleedError::Config(
            "Bleed must be 1 value or 't,r,b,l'".to_string(),
        )),
    }
}

#[cfg(feature = "serde")]
mod serde_impls {
    use super::*;
    use serde::{Deserialize, Serialize};

    // Wire values are the snake strings of the job description.

    impl Serialize for FitMode {
        fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
        where
            S: serde::Serializer,
        {
            serializer.serialize_str(match self {
                FitMode::FitTrimProportional => "fit_trim_proportional",
                FitMode::FitBleedProportional => "fit_bleed_proportional",
                FitMode::FillBleedProportional => "fill_bleed_proportional",
                FitMode::StretchTrim => "stretch_trim",
                FitMode::StretchBleed => "stretch_bleed",
            })
        }
    }

    impl<'de> Deserialize<'de> for FitMode {
        fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
        where
            D: serde::Deserializer<'de>,
        {
            let s = String::deserialize(deserializer)?;
            match s.as_str() {
                "fit_trim_proportional" => Ok(FitMode::FitTrimProportional),
                "fit_bleed_proportional" => Ok(FitMode::FitBleedProportional),
                "fill_bleed_proportional" => Ok(FitMode::FillBleedProportional),
                "stretch_trim" => Ok(FitMode::StretchTrim),
                "stretch_bleed" => Ok(FitMode::StretchBleed),
                _ => Err(serde::de::Error::custom("Unknown fit mode")),
            }
        }
    }

    impl Serialize for BleedGenerator {
        fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
        where
            S: serde::Serializer,
        {
            serializer.serialize_str(match self {
                BleedGenerator::None => "none",
                BleedGenerator::Mirror => "mirror",
                BleedGenerator::Smear => "smear",
            })
        }
    }

    impl<'de> Deserialize<'de> for BleedGenerator {
        fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
        where
            D: serde::Deserializer<'de>,
        {
            let s = String::deserialize(deserializer)?;
            match s.as_str() {
                "none" => Ok(BleedGenerator::None),
                "mirror" => Ok(BleedGenerator::Mirror),
                "smear" => Ok(BleedGenerator::Smear),
                _ => Err(serde::de::Error::custom("Unknown bleed generator")),
            }
        }
    }

    impl Serialize for Anchor {
        fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
        where
            S: serde::Serializer,
        {
            serializer.serialize_str(match self {
                Anchor::Center => "center",
                Anchor::Top => "top",
                Anchor::Bottom => "bottom",
                Anchor::Left => "left",
                Anchor::Right => "right",
                Anchor::TopLeft => "top_left",
                Anchor::TopRight => "top_right",
                Anchor::BottomLeft => "bottom_left",
                Anchor::BottomRight => "bottom_right",
            })
        }
    }

    impl<'de> Deserialize<'de> for Anchor {
        fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
        where
            D: serde::Deserializer<'de>,
        {
            let s = String::deserialize(deserializer)?;
            match s.as_str() {
                "center" => Ok(Anchor::Center),
                "top" => Ok(Anchor::Top),
                "bottom" => Ok(Anchor::Bottom),
                "left" => Ok(Anchor::Left),
                "right" => Ok(Anchor::Right),
                "top_left" => Ok(Anchor::TopLeft),
                "top_right" => Ok(Anchor::TopRight),
                "bottom_left" => Ok(Anchor::BottomLeft),
                "bottom_right" => Ok(Anchor::BottomRight),
                _ => Err(serde::de::Error::custom("Unknown anchor")),
            }
        }
    }

    impl Serialize for PdfBoxKind {
        fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
        where
            S: serde::Serializer,
        {
            serializer.serialize_str(match self {
                PdfBoxKind::Auto => "auto",
                PdfBoxKind::Trim => "trim",
                PdfBoxKind::Bleed => "bleed",
                PdfBoxKind::Crop => "crop",
                PdfBoxKind::Media => "media",
            })
        }
    }

    impl<'de> Deserialize<'de> for PdfBoxKind {
        fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
        where
            D: serde::Deserializer<'de>,
        {
            let s = String::deserialize(deserializer)?;
            match s.as_str() {
                "auto" => Ok(PdfBoxKind::Auto),
                "trim" => Ok(PdfBoxKind::Trim),
                "bleed" => Ok(PdfBoxKind::Bleed),
                "crop" => Ok(PdfBoxKind::Crop),
                "media" => Ok(PdfBoxKind::Media),
                _ => Err(serde::de::Error::custom("Unknown pdf box")),
            }
        }
    }

    // TrimSize and BleedSpec use the wire shape of the job description:
    // numeric fields plus one shared unit tag.

    impl Serialize for TrimSize {
        fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
        where
            S: serde::Serializer,
        {
            use serde::ser::SerializeStruct;
            let mut s = serializer.serialize_struct("TrimSize", 3)?;
            s.serialize_field("w", &self.width.value)?;
            s.serialize_field("h", &self.height.value)?;
            s.serialize_field("unit", self.width.unit.label())?;
            s.end()
        }
    }

    impl<'de> Deserialize<'de> for TrimSize {
        fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
        where
            D: serde::Deserializer<'de>,
        {
            use serde::de::{self, MapAccess, Visitor};
            use std::fmt;

            struct TrimSizeVisitor;

            impl<'de> Visitor<'de> for TrimSizeVisitor {
                type Value = TrimSize;

                fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                    formatter.write_str("a trim size with w, h and unit")
                }

                fn visit_map<M>(self, mut map: M) -> std::result::Result<TrimSize, M::Error>
                where
                    M: MapAccess<'de>,
                {
                    let mut w = None;
                    let mut h = None;
                    let mut unit = None;

                    while let Some(key) = map.next_key::<String>()? {
                        match key.as_str() {
                            "w" => w = Some(map.next_value()?),
                            "h" => h = Some(map.next_value()?),
                            "unit" => unit = Some(map.next_value::<String>()?),
                            _ => {
                                let _: serde::de::IgnoredAny = map.next_value()?;
                            }
                        }
                    }

                    let unit = Unit::parse(unit.as_deref().unwrap_or(""));
                    match (w, h) {
                        (Some(w), Some(h)) => Ok(TrimSize::new(
                            Length::new(w, unit),
                            Length::new(h, unit),
                        )),
                        _ => Err(de::Error::missing_field("w or h")),
                    }
                }
            }

            deserializer.deserialize_map(TrimSizeVisitor)
        }
    }

    impl Serialize for BleedSpec {
        fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
        where
            S: serde::Serializer,
        {
            use serde::ser::SerializeStruct;
            let mut s = serializer.serialize_struct("BleedSpec", 5)?;
            s.serialize_field("top", &self.top.value)?;
            s.serialize_field("right", &self.right.value)?;
            s.serialize_field("bottom", &self.bottom.value)?;
            s.serialize_field("left", &self.left.value)?;
            s.serialize_field("unit", self.top.unit.label())?;
            s.end()
        }
    }

    impl<'de> Deserialize<'de> for BleedSpec {
        fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
        where
            D: serde::Deserializer<'de>,
        {
            use serde::de::{MapAccess, Visitor};
            use std::fmt;

            struct BleedSpecVisitor;

            impl<'de> Visitor<'de> for BleedSpecVisitor {
                type Value = BleedSpec;

                fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                    formatter.write_str("bleed offsets with top, right, bottom, left and unit")
                }

                fn visit_map<M>(self, mut map: M) -> std::result::Result<BleedSpec, M::Error>
                where
                    M: MapAccess<'de>,
                {
                    let mut top = 0.0;
                    let mut right = 0.0;
                    let mut bottom = 0.0;
                    let mut left = 0.0;
                    let mut unit = None;

                    while let Some(key) = map.next_key::<String>()? {
                        match key.as_str() {
                            "top" => top = map.next_value()?,
                            "right" => right = map.next_value()?,
                            "bottom" => bottom = map.next_value()?,
                            "left" => left = map.next_value()?,
                            "unit" => unit = Some(map.next_value::<String>()?),
                            _ => {
                                let _: serde::de::IgnoredAny = map.next_value()?;
                            }
                        }
                    }

                    let unit = Unit::parse(unit.as_deref().unwrap_or(""));
                    Ok(BleedSpec::new(
                        Length::new(top, unit),
                        Length::new(right, unit),
                        Length::new(bottom, unit),
                        Length::new(left, unit),
                    ))
                }
            }

            deserializer.deserialize_map(BleedSpecVisitor)
        }
    }
} // end of serde_impls module
