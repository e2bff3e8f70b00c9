//! Device-level translation across feature families.
//!
//! Each family is translated against its own [`Leftover`] so that the
//! remaining configuration written for one family is not affected by what
//! another family consumed. Notes from every family accumulate in the
//! shared [`TranslationContext`].

use std::fmt::{self, Display, Formatter};

use config_tree_core::Leftover;
use serde::Serialize;
use serde_json::Value;
use tracing::info;

use crate::context::TranslationContext;
use crate::error::TranslateError;
use crate::{acl, network_instances};

/// Wrapper object the orchestration server puts around device config.
pub const NCS_CONFIG: &str = "tailf-ncs:config";

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Feature {
    Acl,
    NetworkInstances,
}

impl Feature {
    pub const ALL: [Feature; 2] = [Feature::Acl, Feature::NetworkInstances];

    /// Name used in output file names.
    pub fn file_stem(self) -> &'static str {
        match self {
            Feature::Acl => "acl",
            Feature::NetworkInstances => "network_instances",
        }
    }
}

impl Display for Feature {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.file_stem())
    }
}

#[derive(Debug, Clone)]
pub struct FeatureTranslation {
    pub feature: Feature,
    pub openconfig: Value,
    pub leftover: Leftover,
}

#[derive(Debug, Clone)]
pub struct DeviceTranslation {
    /// Device configuration with any `tailf-ncs:config` wrapper removed.
    pub source: Value,
    pub features: Vec<FeatureTranslation>,
}

impl DeviceTranslation {
    pub fn feature(&self, feature: Feature) -> Option<&FeatureTranslation> {
        self.features.iter().find(|t| t.feature == feature)
    }
}

/// Strip the `tailf-ncs:config` wrapper if present.
pub fn unwrap_config(before: &Value) -> &Value {
    before.get(NCS_CONFIG).unwrap_or(before)
}

/// Translate one family of `source`.
pub fn translate_feature(
    feature: Feature,
    source: &Value,
    ctx: &mut TranslationContext,
) -> Result<FeatureTranslation, TranslateError> {
    let mut leftover = Leftover::new(source);
    let notes_before = ctx.notes.len();
    let openconfig = match feature {
        Feature::Acl => acl::translate(source, &mut leftover, ctx)?,
        Feature::NetworkInstances => network_instances::translate(source, &mut leftover, ctx)?,
    };
    info!(
        %feature,
        consumed = leftover.consumed().len(),
        notes = ctx.notes.len() - notes_before,
        "feature translated"
    );
    Ok(FeatureTranslation {
        feature,
        openconfig,
        leftover,
    })
}

/// Translate every selected family of one device configuration.
///
/// Features are translated in the order given, duplicates once. The first
/// fatal error aborts the whole device.
pub fn translate_device(
    before: &Value,
    features: &[Feature],
    ctx: &mut TranslationContext,
) -> Result<DeviceTranslation, TranslateError> {
    let source = unwrap_config(before).clone();
    let mut translated: Vec<FeatureTranslation> = Vec::new();
    for &feature in features {
        if translated.iter().any(|t| t.feature == feature) {
            continue;
        }
        translated.push(translate_feature(feature, &source, ctx)?);
    }
    Ok(DeviceTranslation {
        source,
        features: translated,
    })
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::{translate_device, unwrap_config, Feature};
    use crate::context::TranslationContext;
    use crate::error::TranslateError;

    fn device() -> serde_json::Value {
        json!({"tailf-ncs:config": {
            "tailf-ned-cisco-ios:ip": {"access-list": {"standard": {"std-named-acl": [{
                "name": "MGMT",
                "std-access-list-rule": [{"rule": "10 permit host 192.0.2.10"}, {"rule": "20 deny any"}]
            }]}}},
            "tailf-ned-cisco-ios:router": {"ospf": [{"id": 1, "router-id": "1.1.1.1"}]}
        }})
    }

    #[test]
    fn ncs_wrapper_is_removed() {
        let wrapped = device();
        assert!(unwrap_config(&wrapped).get("tailf-ned-cisco-ios:ip").is_some());
        let bare = json!({"tailf-ned-cisco-ios:hostname": "r1"});
        assert_eq!(unwrap_config(&bare), &bare);
    }

    #[test]
    fn each_feature_gets_its_own_leftover() {
        let mut ctx = TranslationContext::default();
        let out = translate_device(
            &device(),
            &[Feature::Acl, Feature::NetworkInstances, Feature::Acl],
            &mut ctx,
        )
        .expect("translate");

        assert_eq!(out.features.len(), 2);
        let acl = out.feature(Feature::Acl).expect("acl");
        assert!(acl.leftover.compact().get("tailf-ned-cisco-ios:ip").is_none());
        assert!(acl.leftover.compact().get("tailf-ned-cisco-ios:router").is_some());

        let instances = out.feature(Feature::NetworkInstances).expect("network instances");
        assert!(instances.leftover.compact().get("tailf-ned-cisco-ios:ip").is_some());
        assert!(instances.leftover.compact().get("tailf-ned-cisco-ios:router").is_none());
    }

    #[test]
    fn fatal_error_aborts_device() {
        let before = json!({"tailf-ned-cisco-ios:router": {"ospf": [{
            "id": 1,
            "network": [{"ip": "10.0.0.0", "mask": "bogus", "area": 0}]
        }]}});
        let mut ctx = TranslationContext::default();

        let err = translate_device(&before, &Feature::ALL, &mut ctx).unwrap_err();
        assert!(matches!(err, TranslateError::InvalidMask { .. }));
    }
}
