use std::fmt;
use std::str::FromStr;

const CINEMATIC_SUFFIX: &str = "cinematic composition, dramatic lighting, epic scene, wide angle shot, 8k resolution, professional photography, motion blur, film grain, depth of field";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ImageMode {
    Img,
    Cinematic,
}

impl ImageMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ImageMode::Img => "img",
            ImageMode::Cinematic => "cinematic",
        }
    }

    pub fn dimensions(&self) -> (u32, u32) {
        match self {
            ImageMode::Img => (1024, 1024),
            ImageMode::Cinematic => (1920, 1080),
        }
    }

    pub fn decorate_prompt(&self, prompt: &str) -> String {
        match self {
            ImageMode::Img => prompt.to_string(),
            ImageMode::Cinematic => format!("{}, {}", prompt, CINEMATIC_SUFFIX),
        }
    }
}

impl FromStr for ImageMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "img" => Ok(ImageMode::Img),
            "cinematic" => Ok(ImageMode::Cinematic),
            other => Err(format!("Invalid mode: {}", other)),
        }
    }
}

impl fmt::Display for ImageMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
