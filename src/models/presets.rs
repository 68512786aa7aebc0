use crate::error::StabilityError;
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Declares a wire enum whose `as_str`, `Display`, `FromStr` and serde forms
/// all come from the one literal listed per variant.
macro_rules! wire_enum {
    (
        $(#[$meta:meta])*
        $name:ident { $($variant:ident => $literal:literal),+ $(,)? }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $literal),+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = StabilityError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($literal => Ok($name::$variant),)+
                    other => Err(StabilityError::ConfigError(format!(
                        "unknown {} value: {}",
                        stringify!($name),
                        other
                    ))),
                }
            }
        }

        impl Serialize for $name {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(self.as_str())
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let value = String::deserialize(deserializer)?;
                value.parse().map_err(de::Error::custom)
            }
        }
    };
}

wire_enum!(
    /// Sampler used for the diffusion process.
    Sampler {
        Ddim => "DDIM",
        Ddpm => "DDPM",
        KDpmpp2m => "K_DPMPP_2M",
        KDpmpp2sAncestral => "K_DPMPP_2S_ANCESTRAL",
        KDpm2 => "K_DPM_2",
        KDpm2Ancestral => "K_DPM_2_ANCESTRAL",
        KEuler => "K_EULER",
        KEulerAncestral => "K_EULER_ANCESTRAL",
        KHeun => "K_HEUN",
        KLms => "K_LMS",
    }
);

wire_enum!(
    /// CLIP guidance strategy.
    ClipGuidancePreset {
        None => "NONE",
        FastBlue => "FAST_BLUE",
        FastGreen => "FAST_GREEN",
        Simple => "SIMPLE",
        Slow => "SLOW",
        Slower => "SLOWER",
        Slowest => "SLOWEST",
    }
);

wire_enum!(
    /// Style presets steer the model towards a particular look.
    /// The server-side list is subject to change.
    StylePreset {
        Model3d => "3d-model",
        AnalogFilm => "analog-film",
        Anime => "anime",
        Cinematic => "cinematic",
        ComicBook => "comic-book",
        DigitalArt => "digital-art",
        Enhance => "enhance",
        FantasyArt => "fantasy-art",
        Isometric => "isometric",
        LineArt => "line-art",
        LowPoly => "low-poly",
        ModelingCompound => "modeling-compound",
        NeonPunk => "neon-punk",
        Origami => "origami",
        Photographic => "photographic",
        PixelArt => "pixel-art",
        TileTexture => "tile-texture",
    }
);

wire_enum!(
    FinishReason {
        ContentFiltered => "CONTENT_FILTERED",
        Error => "ERROR",
        Success => "SUCCESS",
    }
);

wire_enum!(
    EngineType {
        Audio => "AUDIO",
        Classification => "CLASSIFICATION",
        Picture => "PICTURE",
        Storage => "STORAGE",
        Text => "TEXT",
        Video => "VIDEO",
    }
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serde_matches_as_str() {
        for sampler in Sampler::ALL {
            let json = serde_json::to_string(sampler).unwrap();
            assert_eq!(json, format!("\"{}\"", sampler.as_str()));
        }
        for preset in StylePreset::ALL {
            let json = serde_json::to_string(preset).unwrap();
            assert_eq!(json, format!("\"{}\"", preset.as_str()));
        }
        for preset in ClipGuidancePreset::ALL {
            let json = serde_json::to_string(preset).unwrap();
            assert_eq!(json, format!("\"{}\"", preset.as_str()));
        }
        for reason in FinishReason::ALL {
            let json = serde_json::to_string(reason).unwrap();
            assert_eq!(json, format!("\"{}\"", reason.as_str()));
        }
        for kind in EngineType::ALL {
            let json = serde_json::to_string(kind).unwrap();
            assert_eq!(json, format!("\"{}\"", kind.as_str()));
        }
    }

    #[test]
    fn test_documented_literals() {
        assert_eq!(Sampler::KEuler.to_string(), "K_EULER");
        assert_eq!(StylePreset::DigitalArt.to_string(), "digital-art");
        assert_eq!(StylePreset::Model3d.to_string(), "3d-model");
        assert_eq!(ClipGuidancePreset::FastBlue.to_string(), "FAST_BLUE");
    }

    #[test]
    fn test_from_str() {
        assert_eq!("K_DPM_2".parse::<Sampler>().unwrap(), Sampler::KDpm2);
        assert_eq!(
            "neon-punk".parse::<StylePreset>().unwrap(),
            StylePreset::NeonPunk
        );
        assert!(matches!(
            "k_euler".parse::<Sampler>(),
            Err(StabilityError::ConfigError(_))
        ));
    }

    #[test]
    fn test_deserialize_uses_wire_literals() {
        let preset: StylePreset = serde_json::from_str("\"3d-model\"").unwrap();
        assert_eq!(preset, StylePreset::Model3d);
        let reason: FinishReason = serde_json::from_str("\"CONTENT_FILTERED\"").unwrap();
        assert_eq!(reason, FinishReason::ContentFiltered);

        let err = serde_json::from_str::<Sampler>("\"K_WHATEVER\"").unwrap_err();
        assert!(err.to_string().contains("unknown Sampler value: K_WHATEVER"));
    }
}
