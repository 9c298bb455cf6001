//! The engine's dependency catalog.
//!
//! Declaration order is resolution order. Later steps (option configuration,
//! license aggregation) rely on it, so never sort this table.

use semver::Version;

use crate::core::capability::Capability;
use crate::core::dependency::{Condition, DependencyKind, DependencySpec};
use crate::core::package_id::PackageId;
use crate::resolver::errors::ResolveError;

/// Exclusive group for the Lua implementation sol2 binds against.
pub const LUA_GROUP: &str = "lua";

/// One static catalog row.
#[derive(Debug, Clone, Copy)]
pub struct Declaration {
    pub name: &'static str,
    pub version: &'static str,
    pub condition: Condition,
    pub kind: DependencyKind,
    pub group: Option<&'static str>,
}

const fn require(name: &'static str, version: &'static str) -> Declaration {
    Declaration {
        name,
        version,
        condition: Condition::Always,
        kind: DependencyKind::Require,
        group: None,
    }
}

const fn when(name: &'static str, version: &'static str, cap: Capability) -> Declaration {
    Declaration {
        condition: Condition::When(cap),
        ..require(name, version)
    }
}

/// Every package the engine knows about, in resolution order.
pub const CATALOG: &[Declaration] = &[
    require("fmt", "11.1.4"),
    require("libspng", "0.7.4"),
    require("nlohmann_json", "3.11.3"),
    require("ogg", "1.3.5"),
    require("openal-soft", "1.23.1"),
    require("physfs", "3.2.0"),
    require("sdl", "3.2.6"),
    require("sol2", "3.5.0"),
    require("vorbis", "1.3.7"),
    Declaration {
        kind: DependencyKind::Override,
        ..require("libalsa", "1.2.12")
    },
    when("boost", "1.87.0", Capability::NativeNetworking),
    Declaration {
        group: Some(LUA_GROUP),
        ..when("luajit", "2.1.0-beta3", Capability::Jit)
    },
    Declaration {
        condition: Condition::Unless(Capability::Jit),
        group: Some(LUA_GROUP),
        ..require("lua", "5.4.7")
    },
    when("openssl", "3.4.1", Capability::NativeNetworking),
    when("sentry-native", "0.7.20", Capability::CrashReporting),
];

impl Declaration {
    /// Turn the row into a spec, parsing the pinned version.
    pub fn to_spec(&self) -> Result<DependencySpec, ResolveError> {
        let version = Version::parse(self.version).map_err(|e| ResolveError::InvalidVersion {
            package: self.name.to_string(),
            version: self.version.to_string(),
            message: e.to_string(),
        })?;

        let mut spec = DependencySpec::new(PackageId::new(self.name, version))
            .with_condition(self.condition)
            .with_kind(self.kind);

        if let Some(group) = self.group {
            spec = spec.in_group(group);
        }

        Ok(spec)
    }
}

/// Parse the whole catalog.
pub fn declared() -> Result<Vec<DependencySpec>, ResolveError> {
    CATALOG.iter().map(Declaration::to_spec).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_catalog_versions_parse() {
        let specs = declared().unwrap();
        assert_eq!(specs.len(), CATALOG.len());
    }

    #[test]
    fn test_catalog_names_unique() {
        let mut seen = HashSet::new();
        for decl in CATALOG {
            assert!(seen.insert(decl.name), "duplicate entry: {}", decl.name);
        }
    }

    #[test]
    fn test_lua_group_members() {
        let members: Vec<_> = CATALOG
            .iter()
            .filter(|d| d.group == Some(LUA_GROUP))
            .map(|d| d.name)
            .collect();
        assert_eq!(members, vec!["luajit", "lua"]);
    }

    #[test]
    fn test_invalid_version_is_reported() {
        let decl = require("broken", "not-a-version");
        let err = decl.to_spec().unwrap_err();
        assert!(matches!(err, ResolveError::InvalidVersion { ref package, .. } if package == "broken"));
    }
}
