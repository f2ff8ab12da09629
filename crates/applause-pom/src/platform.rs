//! Target platforms and locator selection by platform fallback.
//!
//! Platforms form a tree rooted at [`Platform::Default`]. A locator declared
//! for `Web` applies to `WebDesktopChrome` unless a more specific locator is
//! declared for `WebDesktopChrome` or `WebDesktop`.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

macro_rules! platforms {
    ($( $variant:ident => ($friendly:literal, $upper:literal, $fallback:expr) ),+ $(,)?) => {
        /// A platform a test can run against
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum Platform {
            $(
                #[doc = $friendly]
                $variant,
            )+
        }

        impl Platform {
            /// Every platform, parents before children
            pub const ALL: &'static [Self] = &[$(Self::$variant),+];

            /// Concatenated display name, e.g. `WebDesktopChrome`
            #[must_use]
            pub const fn friendly_name(self) -> &'static str {
                match self {
                    $(Self::$variant => $friendly,)+
                }
            }

            /// Underscored name, e.g. `WEB_DESKTOP_CHROME`
            #[must_use]
            pub const fn constant_name(self) -> &'static str {
                match self {
                    $(Self::$variant => $upper,)+
                }
            }

            /// Immediate parent in the platform tree
            #[must_use]
            pub const fn fallback(self) -> Option<Self> {
                match self {
                    $(Self::$variant => $fallback,)+
                }
            }
        }
    };
}

platforms! {
    Default => ("Default", "DEFAULT", None),
    Mobile => ("Mobile", "MOBILE", Some(Self::Default)),
    MobileAndroid => ("MobileAndroid", "MOBILE_ANDROID", Some(Self::Mobile)),
    MobileAndroidPhone => ("MobileAndroidPhone", "MOBILE_ANDROID_PHONE", Some(Self::MobileAndroid)),
    MobileAndroidTablet => ("MobileAndroidTablet", "MOBILE_ANDROID_TABLET", Some(Self::MobileAndroid)),
    MobileAndroidSmallTablet => ("MobileAndroidSmallTablet", "MOBILE_ANDROID_SMALL_TABLET", Some(Self::MobileAndroid)),
    MobileIos => ("MobileIOS", "MOBILE_IOS", Some(Self::Mobile)),
    MobileIosPhone => ("MobileIOSPhone", "MOBILE_IOS_PHONE", Some(Self::MobileIos)),
    MobileIosTablet => ("MobileIOSTablet", "MOBILE_IOS_TABLET", Some(Self::MobileIos)),
    MobileIosSmallTablet => ("MobileIOSSmallTablet", "MOBILE_IOS_SMALL_TABLET", Some(Self::MobileIos)),
    Web => ("Web", "WEB", Some(Self::Default)),
    WebDesktop => ("WebDesktop", "WEB_DESKTOP", Some(Self::Web)),
    WebDesktopChrome => ("WebDesktopChrome", "WEB_DESKTOP_CHROME", Some(Self::WebDesktop)),
    WebDesktopEdge => ("WebDesktopEdge", "WEB_DESKTOP_EDGE", Some(Self::WebDesktop)),
    WebDesktopFirefox => ("WebDesktopFirefox", "WEB_DESKTOP_FIREFOX", Some(Self::WebDesktop)),
    WebDesktopIe => ("WebDesktopIE", "WEB_DESKTOP_IE", Some(Self::WebDesktop)),
    WebDesktopSafari => ("WebDesktopSafari", "WEB_DESKTOP_SAFARI", Some(Self::WebDesktop)),
    WebMobile => ("WebMobile", "WEB_MOBILE", Some(Self::Web)),
    WebMobilePhone => ("WebMobilePhone", "WEB_MOBILE_PHONE", Some(Self::WebMobile)),
    WebAndroidPhone => ("WebAndroidPhone", "WEB_ANDROID_PHONE", Some(Self::WebMobilePhone)),
    WebIosPhone => ("WebIOSPhone", "WEB_IOS_PHONE", Some(Self::WebMobilePhone)),
    WebMobileTablet => ("WebMobileTablet", "WEB_MOBILE_TABLET", Some(Self::WebMobile)),
    WebAndroidTablet => ("WebAndroidTablet", "WEB_ANDROID_TABLET", Some(Self::WebMobileTablet)),
    WebIosTablet => ("WebIOSTablet", "WEB_IOS_TABLET", Some(Self::WebMobileTablet)),
    WebMobileSmallTablet => ("WebMobileSmallTablet", "WEB_MOBILE_SMALL_TABLET", Some(Self::WebMobile)),
    WebAndroidSmallTablet => ("WebAndroidSmallTablet", "WEB_ANDROID_SMALL_TABLET", Some(Self::WebMobileSmallTablet)),
    WebIosSmallTablet => ("WebIOSSmallTablet", "WEB_IOS_SMALL_TABLET", Some(Self::WebMobileSmallTablet)),
    Ott => ("OTT", "OTT", Some(Self::Default)),
    OttFireTv => ("OttFireTv", "OTT_FIRE_TV", Some(Self::Ott)),
    OttFireTv4k => ("OttFireTv4k", "OTT_FIRE_TV_4K", Some(Self::OttFireTv)),
    OttAppleTv => ("OttAppleTv", "OTT_APPLE_TV", Some(Self::Ott)),
    OttAppleTv4k => ("OttAppleTv4k", "OTT_APPLE_TV_4K", Some(Self::OttAppleTv)),
    OttChromecast => ("OttChromecast", "OTT_CHROMECAST", Some(Self::Ott)),
    OttAndroidTv => ("OttAndroidTv", "OTT_ANDROID_TV", Some(Self::Ott)),
}

impl Platform {
    /// Look up a platform by friendly or underscored name, case-insensitively
    ///
    /// Unrecognized names resolve to [`Platform::Default`].
    #[must_use]
    pub fn from_name(name: &str) -> Self {
        Self::lookup(name).unwrap_or_else(|| {
            tracing::error!(platform = name, "Unrecognized platform, using Default");
            Self::Default
        })
    }

    fn lookup(name: &str) -> Option<Self> {
        let name = name.trim();
        Self::ALL
            .iter()
            .copied()
            .find(|p| p.friendly_name().eq_ignore_ascii_case(name))
            .or_else(|| {
                Self::ALL
                    .iter()
                    .copied()
                    .find(|p| p.constant_name().eq_ignore_ascii_case(name))
            })
    }

    /// True if `other` is this platform or one of its ancestors
    #[must_use]
    pub fn has_fallback(self, other: Self) -> bool {
        self.fallback_chain().any(|p| p == other)
    }

    /// True for native mobile platforms
    #[must_use]
    pub fn is_native(self) -> bool {
        self.has_fallback(Self::Mobile)
    }

    /// This platform followed by each ancestor up to `Default`
    pub fn fallback_chain(self) -> impl Iterator<Item = Self> {
        std::iter::successors(Some(self), |p| p.fallback())
    }
}

impl Default for Platform {
    fn default() -> Self {
        Self::Default
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.friendly_name())
    }
}

/// Parse error for [`Platform`]
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unrecognized platform [{0}]")]
pub struct UnknownPlatform(pub String);

impl FromStr for Platform {
    type Err = UnknownPlatform;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::lookup(s).ok_or_else(|| UnknownPlatform(s.to_string()))
    }
}

/// Candidates matching the closest platform in the fallback chain
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlatformMatch<'a, T> {
    /// Platform the matches were declared for
    pub platform: Platform,
    /// Matching candidates, in declaration order
    pub matches: Vec<&'a T>,
}

/// Pick the candidates declared for the nearest platform in `platform`'s
/// fallback chain
///
/// Returns an empty match on `Default` when no candidate applies.
pub fn select_for_platform<'a, T>(
    candidates: &'a [T],
    platform: Platform,
    platform_of: impl Fn(&T) -> Platform,
) -> PlatformMatch<'a, T> {
    for current in platform.fallback_chain() {
        let matches: Vec<&T> = candidates
            .iter()
            .filter(|c| platform_of(c) == current)
            .collect();
        if !matches.is_empty() {
            return PlatformMatch {
                platform: current,
                matches,
            };
        }
    }
    PlatformMatch {
        platform: Platform::Default,
        matches: Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    mod lookup_tests {
        use super::*;

        #[test]
        fn test_friendly_name_case_insensitive() {
            assert_eq!(
                Platform::from_name("webdesktopchrome"),
                Platform::WebDesktopChrome
            );
            assert_eq!(Platform::from_name("MobileIOS"), Platform::MobileIos);
        }

        #[test]
        fn test_underscored_name() {
            assert_eq!(
                Platform::from_name("web_desktop_chrome"),
                Platform::WebDesktopChrome
            );
            assert_eq!(Platform::from_name("OTT_FIRE_TV_4K"), Platform::OttFireTv4k);
        }

        #[test]
        fn test_unknown_platform_is_default() {
            assert_eq!(Platform::from_name("Commodore64"), Platform::Default);
            assert!("Commodore64".parse::<Platform>().is_err());
        }

        #[test]
        fn test_display_is_friendly_name() {
            assert_eq!(Platform::WebIosTablet.to_string(), "WebIOSTablet");
        }
    }

    mod fallback_tests {
        use super::*;

        #[test]
        fn test_chain_reaches_default() {
            let chain: Vec<_> = Platform::WebAndroidPhone.fallback_chain().collect();
            assert_eq!(
                chain,
                vec![
                    Platform::WebAndroidPhone,
                    Platform::WebMobilePhone,
                    Platform::WebMobile,
                    Platform::Web,
                    Platform::Default,
                ]
            );
        }

        #[test]
        fn test_has_fallback() {
            assert!(Platform::WebDesktopChrome.has_fallback(Platform::Web));
            assert!(Platform::WebDesktopChrome.has_fallback(Platform::WebDesktopChrome));
            assert!(!Platform::Web.has_fallback(Platform::WebDesktop));
            assert!(!Platform::MobileAndroid.has_fallback(Platform::Web));
        }

        #[test]
        fn test_native() {
            assert!(Platform::MobileAndroidTablet.is_native());
            assert!(!Platform::WebAndroidPhone.is_native());
            assert!(!Platform::Default.is_native());
        }

        #[test]
        fn test_every_platform_reaches_default() {
            for p in Platform::ALL {
                assert_eq!(p.fallback_chain().last(), Some(Platform::Default));
            }
        }
    }

    mod select_tests {
        use super::*;

        #[test]
        fn test_select_nearest_platform() {
            let candidates = [
                (Platform::Default, "#generic"),
                (Platform::Web, "#web"),
                (Platform::MobileAndroid, "~android"),
            ];
            let found = select_for_platform(&candidates, Platform::WebDesktopChrome, |c| c.0);
            assert_eq!(found.platform, Platform::Web);
            assert_eq!(found.matches, vec![&candidates[1]]);

            let found = select_for_platform(&candidates, Platform::MobileIosPhone, |c| c.0);
            assert_eq!(found.platform, Platform::Default);
            assert_eq!(found.matches[0].1, "#generic");
        }

        #[test]
        fn test_select_no_match() {
            let candidates = [(Platform::Web, "#web")];
            let found = select_for_platform(&candidates, Platform::Ott, |c| c.0);
            assert_eq!(found.platform, Platform::Default);
            assert!(found.matches.is_empty());
        }
    }
}
