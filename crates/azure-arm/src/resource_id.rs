//! Typed hierarchical resource IDs
//!
//! ARM identifies every resource by a path of the form
//! `/subscriptions/{sub}/resourceGroups/{rg}/providers/{namespace}/{type}/{name}`,
//! optionally nested further for child resources. Static segments are
//! matched case-insensitively on parse (the service accepts any casing);
//! `Display` always emits the canonical casing.

use std::fmt;
use std::str::FromStr;

use crate::error::{ArmError, Result};

/// Segment-by-segment walker over a resource ID path.
struct IdParser<'a> {
    id: &'a str,
    parts: std::vec::IntoIter<&'a str>,
}

impl<'a> IdParser<'a> {
    fn new(id: &'a str) -> Result<Self> {
        let trimmed = match id.strip_prefix('/') {
            Some(rest) => rest,
            None => return Err(invalid(id, "must start with '/'")),
        };
        let trimmed = trimmed.strip_suffix('/').unwrap_or(trimmed);
        let parts: Vec<&str> = trimmed.split('/').collect();
        if parts.iter().any(|p| p.is_empty()) {
            return Err(invalid(id, "contains an empty segment"));
        }
        Ok(Self {
            id,
            parts: parts.into_iter(),
        })
    }

    /// Consume a static segment, matching case-insensitively.
    fn literal(&mut self, expected: &str) -> Result<()> {
        match self.parts.next() {
            Some(part) if part.eq_ignore_ascii_case(expected) => Ok(()),
            Some(part) => Err(invalid(
                self.id,
                &format!("expected segment {expected:?}, found {part:?}"),
            )),
            None => Err(invalid(self.id, &format!("missing segment {expected:?}"))),
        }
    }

    /// Consume a value segment.
    fn value(&mut self, what: &str) -> Result<String> {
        match self.parts.next() {
            Some(part) => Ok(part.to_string()),
            None => Err(invalid(self.id, &format!("missing {what}"))),
        }
    }

    /// Assert the path is fully consumed.
    fn finish(mut self) -> Result<()> {
        match self.parts.next() {
            None => Ok(()),
            Some(part) => Err(invalid(
                self.id,
                &format!("unexpected trailing segment {part:?}"),
            )),
        }
    }
}

fn invalid(id: &str, reason: &str) -> ArmError {
    ArmError::InvalidResourceId {
        id: id.to_string(),
        reason: reason.to_string(),
    }
}

/// `/subscriptions/{sub}/resourceGroups/{rg}`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceGroupId {
    pub subscription_id: String,
    pub resource_group: String,
}

impl ResourceGroupId {
    pub fn new(subscription_id: impl Into<String>, resource_group: impl Into<String>) -> Self {
        Self {
            subscription_id: subscription_id.into(),
            resource_group: resource_group.into(),
        }
    }
}

impl fmt::Display for ResourceGroupId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "/subscriptions/{}/resourceGroups/{}",
            self.subscription_id, self.resource_group
        )
    }
}

impl FromStr for ResourceGroupId {
    type Err = ArmError;

    fn from_str(s: &str) -> Result<Self> {
        let mut p = IdParser::new(s)?;
        p.literal("subscriptions")?;
        let subscription_id = p.value("subscription ID")?;
        p.literal("resourceGroups")?;
        let resource_group = p.value("resource group name")?;
        p.finish()?;
        Ok(Self {
            subscription_id,
            resource_group,
        })
    }
}

/// Generates a typed ID for a top-level resource:
/// `/subscriptions/{sub}/resourceGroups/{rg}/providers/{namespace}/{type}/{name}`.
macro_rules! top_level_resource_id {
    ($(#[$doc:meta])* $name:ident, $namespace:literal, $resource_type:literal, $what:literal) => {
        $(#[$doc])*
        #[derive(Debug, Clone, PartialEq, Eq)]
        pub struct $name {
            pub subscription_id: String,
            pub resource_group: String,
            pub name: String,
        }

        impl $name {
            pub fn new(
                subscription_id: impl Into<String>,
                resource_group: impl Into<String>,
                name: impl Into<String>,
            ) -> Self {
                Self {
                    subscription_id: subscription_id.into(),
                    resource_group: resource_group.into(),
                    name: name.into(),
                }
            }

            /// The containing resource group.
            pub fn resource_group_id(&self) -> ResourceGroupId {
                ResourceGroupId::new(self.subscription_id.clone(), self.resource_group.clone())
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(
                    f,
                    "/subscriptions/{}/resourceGroups/{}/providers/{}/{}/{}",
                    self.subscription_id,
                    self.resource_group,
                    $namespace,
                    $resource_type,
                    self.name
                )
            }
        }

        impl FromStr for $name {
            type Err = ArmError;

            fn from_str(s: &str) -> Result<Self> {
                let mut p = IdParser::new(s)?;
                p.literal("subscriptions")?;
                let subscription_id = p.value("subscription ID")?;
                p.literal("resourceGroups")?;
                let resource_group = p.value("resource group name")?;
                p.literal("providers")?;
                p.literal($namespace)?;
                p.literal($resource_type)?;
                let name = p.value($what)?;
                p.finish()?;
                Ok(Self {
                    subscription_id,
                    resource_group,
                    name,
                })
            }
        }
    };
}

top_level_resource_id!(
    /// `Microsoft.Solutions/applicationDefinitions/{name}`
    ApplicationDefinitionId,
    "Microsoft.Solutions",
    "applicationDefinitions",
    "application definition name"
);

top_level_resource_id!(
    /// `Microsoft.Solutions/applications/{name}`
    ManagedApplicationId,
    "Microsoft.Solutions",
    "applications",
    "application name"
);

top_level_resource_id!(
    /// `Microsoft.Cache/redisEnterprise/{name}`
    RedisEnterpriseClusterId,
    "Microsoft.Cache",
    "redisEnterprise",
    "cluster name"
);

top_level_resource_id!(
    /// `Microsoft.RedHatOpenShift/openShiftClusters/{name}`
    OpenShiftClusterId,
    "Microsoft.RedHatOpenShift",
    "openShiftClusters",
    "cluster name"
);

impl RedisEnterpriseClusterId {
    /// ID of a database inside this cluster.
    pub fn database(&self, name: impl Into<String>) -> RedisEnterpriseDatabaseId {
        RedisEnterpriseDatabaseId {
            cluster: self.clone(),
            name: name.into(),
        }
    }
}

/// `Microsoft.Cache/redisEnterprise/{cluster}/databases/{name}`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RedisEnterpriseDatabaseId {
    pub cluster: RedisEnterpriseClusterId,
    pub name: String,
}

impl RedisEnterpriseDatabaseId {
    pub fn new(
        subscription_id: impl Into<String>,
        resource_group: impl Into<String>,
        cluster_name: impl Into<String>,
        name: impl Into<String>,
    ) -> Self {
        Self {
            cluster: RedisEnterpriseClusterId::new(subscription_id, resource_group, cluster_name),
            name: name.into(),
        }
    }
}

impl fmt::Display for RedisEnterpriseDatabaseId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/databases/{}", self.cluster, self.name)
    }
}

impl FromStr for RedisEnterpriseDatabaseId {
    type Err = ArmError;

    fn from_str(s: &str) -> Result<Self> {
        let mut p = IdParser::new(s)?;
        p.literal("subscriptions")?;
        let subscription_id = p.value("subscription ID")?;
        p.literal("resourceGroups")?;
        let resource_group = p.value("resource group name")?;
        p.literal("providers")?;
        p.literal("Microsoft.Cache")?;
        p.literal("redisEnterprise")?;
        let cluster_name = p.value("cluster name")?;
        p.literal("databases")?;
        let name = p.value("database name")?;
        p.finish()?;
        Ok(Self {
            cluster: RedisEnterpriseClusterId::new(subscription_id, resource_group, cluster_name),
            name,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn resource_group_round_trip() {
        let id: ResourceGroupId = "/subscriptions/sub-1/resourceGroups/rg-1".parse().unwrap();
        assert_eq!(id.subscription_id, "sub-1");
        assert_eq!(id.resource_group, "rg-1");
        assert_eq!(id.to_string(), "/subscriptions/sub-1/resourceGroups/rg-1");
    }

    #[test]
    fn cluster_id_round_trip() {
        let raw =
            "/subscriptions/sub-1/resourceGroups/rg-1/providers/Microsoft.Cache/redisEnterprise/c1";
        let id: RedisEnterpriseClusterId = raw.parse().unwrap();
        assert_eq!(id.name, "c1");
        assert_eq!(id.to_string(), raw);
    }

    #[test]
    fn static_segments_parse_case_insensitively() {
        let id: RedisEnterpriseClusterId =
            "/SUBSCRIPTIONS/sub-1/resourcegroups/rg-1/Providers/microsoft.cache/redisenterprise/c1"
                .parse()
                .unwrap();
        // Display restores canonical casing.
        assert_eq!(
            id.to_string(),
            "/subscriptions/sub-1/resourceGroups/rg-1/providers/Microsoft.Cache/redisEnterprise/c1"
        );
    }

    #[test]
    fn value_segments_keep_their_casing() {
        let id: ManagedApplicationId =
            "/subscriptions/Sub-A/resourceGroups/RG-Mixed/providers/Microsoft.Solutions/applications/MyApp"
                .parse()
                .unwrap();
        assert_eq!(id.resource_group, "RG-Mixed");
        assert_eq!(id.name, "MyApp");
    }

    #[test]
    fn database_id_round_trip() {
        let raw = "/subscriptions/s/resourceGroups/rg/providers/Microsoft.Cache/redisEnterprise/c1/databases/default";
        let id: RedisEnterpriseDatabaseId = raw.parse().unwrap();
        assert_eq!(id.cluster.name, "c1");
        assert_eq!(id.name, "default");
        assert_eq!(id.to_string(), raw);
    }

    #[test]
    fn database_helper_builds_child_id() {
        let cluster = RedisEnterpriseClusterId::new("s", "rg", "c1");
        let db = cluster.database("default");
        assert_eq!(
            db.to_string(),
            "/subscriptions/s/resourceGroups/rg/providers/Microsoft.Cache/redisEnterprise/c1/databases/default"
        );
    }

    #[test]
    fn trailing_slash_is_tolerated() {
        let id: OpenShiftClusterId =
            "/subscriptions/s/resourceGroups/rg/providers/Microsoft.RedHatOpenShift/openShiftClusters/aro/"
                .parse()
                .unwrap();
        assert_eq!(id.name, "aro");
    }

    #[test]
    fn rejects_wrong_provider() {
        let err = "/subscriptions/s/resourceGroups/rg/providers/Microsoft.Compute/redisEnterprise/c1"
            .parse::<RedisEnterpriseClusterId>()
            .unwrap_err();
        assert!(err.to_string().contains("Microsoft.Cache"));
    }

    #[test]
    fn rejects_trailing_segments() {
        let err = "/subscriptions/s/resourceGroups/rg/providers/Microsoft.Cache/redisEnterprise/c1/databases/d"
            .parse::<RedisEnterpriseClusterId>()
            .unwrap_err();
        assert!(err.to_string().contains("trailing"));
    }

    #[test]
    fn rejects_missing_segments_and_empty_segments() {
        assert!("/subscriptions/s/resourceGroups"
            .parse::<ResourceGroupId>()
            .is_err());
        assert!("/subscriptions//resourceGroups/rg"
            .parse::<ResourceGroupId>()
            .is_err());
        assert!("subscriptions/s/resourceGroups/rg"
            .parse::<ResourceGroupId>()
            .is_err());
    }
}
