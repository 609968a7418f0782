use serde::{Deserialize, Serialize};
use std::fmt;

/// Social network a proof was posted on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SocialPlatform {
    #[default]
    Instagram,
    Facebook,
}

impl SocialPlatform {
    #[inline]
    pub const fn as_str(&self) -> &'static str {
        match self {
            SocialPlatform::Instagram => "Instagram",
            SocialPlatform::Facebook => "Facebook",
        }
    }
}

impl fmt::Display for SocialPlatform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
