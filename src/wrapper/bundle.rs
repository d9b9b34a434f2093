//! Bundle metadata (spec §2a, §4.8): the *data* a build step needs to write a macOS-style
//! `.vst3` bundle's `Info.plist` and `PkgInfo`. Grounded in the teacher's
//! `nih_plug_xtask::maybe_create_macos_bundle_metadata`, with the file-writing stripped out since
//! that belongs to build-system glue, which is out of scope.

/// The fixed 8-byte contents of a VST3 bundle's `PkgInfo` file: package type `BNDL` followed by
/// the conventional unknown 4-byte creator code `????`.
pub const PKG_INFO: [u8; 8] = *b"BNDL????";

/// One `<key>`/`<string>` (or `<true/>`) pair destined for `Info.plist`'s top-level `<dict>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlistField {
    pub key: &'static str,
    pub value: PlistValue,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlistValue {
    String(String),
    Bool(bool),
}

/// The `Info.plist` fields for a plugin bundle named `display_name`, built from its package name
/// (used to derive the reverse-DNS bundle identifier `com.zplugin.<package>`) and version.
///
/// This returns structured data rather than XML text; a build step can render it however its
/// plist-writing crate expects.
pub fn info_plist_fields(package: &str, display_name: &str, version: &str) -> Vec<PlistField> {
    vec![
        PlistField {
            key: "CFBundleExecutable",
            value: PlistValue::String(display_name.to_owned()),
        },
        PlistField {
            key: "CFBundleIdentifier",
            value: PlistValue::String(format!("com.zplugin.{package}")),
        },
        PlistField {
            key: "CFBundleName",
            value: PlistValue::String(display_name.to_owned()),
        },
        PlistField {
            key: "CFBundlePackageType",
            value: PlistValue::String("BNDL".to_owned()),
        },
        PlistField {
            key: "CFBundleSignature",
            value: PlistValue::String("????".to_owned()),
        },
        PlistField {
            key: "CFBundleVersion",
            value: PlistValue::String(version.to_owned()),
        },
        PlistField {
            key: "NSHighResolutionCapable",
            value: PlistValue::Bool(true),
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pkg_info_is_eight_bytes() {
        assert_eq!(PKG_INFO.len(), 8);
        assert_eq!(&PKG_INFO, b"BNDL????");
    }

    #[test]
    fn bundle_identifier_uses_reverse_dns_prefix() {
        let fields = info_plist_fields("gain", "Gain", "1.0.0");
        let identifier = fields
            .iter()
            .find(|f| f.key == "CFBundleIdentifier")
            .unwrap();
        assert_eq!(
            identifier.value,
            PlistValue::String("com.zplugin.gain".to_owned())
        );
    }

    #[test]
    fn package_type_is_bndl() {
        let fields = info_plist_fields("gain", "Gain", "1.0.0");
        let package_type = fields
            .iter()
            .find(|f| f.key == "CFBundlePackageType")
            .unwrap();
        assert_eq!(package_type.value, PlistValue::String("BNDL".to_owned()));
    }

    #[test]
    fn high_resolution_capable_is_true() {
        let fields = info_plist_fields("gain", "Gain", "1.0.0");
        let hi_res = fields
            .iter()
            .find(|f| f.key == "NSHighResolutionCapable")
            .unwrap();
        assert_eq!(hi_res.value, PlistValue::Bool(true));
    }
}
