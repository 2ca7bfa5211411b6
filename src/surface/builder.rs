//! Command surface construction.
//!
//! Protocol tables are layered in a fixed order and folded left to right
//! into one table. On an `(endpoint, method)` collision the later layer
//! replaces the earlier entry. Every surviving entry is then registered by
//! command name; when two endpoints declare the same name, the entry from
//! the later layer wins.
//!
//! # Layers
//!
//! | # | Table | Applies when |
//! |---|-------|--------------|
//! | 1 | jsonwp | mobile, or legacy dialect |
//! | 2 | webdriver | mobile, or W3C dialect |
//! | 3 | mjsonwp | mobile |
//! | 4 | appium | mobile |
//! | 5 | chromium | chrome |
//! | 6 | gecko | firefox |
//! | 7 | saucelabs | sauce |
//! | 8 | selenium | selenium standalone |

// ============================================================================
// Imports
// ============================================================================

use rustc_hash::FxHashMap;
use tracing::debug;

use crate::protocol::command::{CommandDescriptor, HttpMethod, ProtocolCommandTable};
use crate::protocol::tables::{
    APPIUM, CHROMIUM, GECKO, JSONWP, MJSONWP, SAUCELABS, SELENIUM, WEBDRIVER,
};

use super::binding::CommandBinding;
use super::flags::{Dialect, FeatureFlags};
use super::CommandSurface;

// ============================================================================
// Layers
// ============================================================================

/// A protocol table guarded by the flags it requires.
struct Layer {
    applies: fn(&FeatureFlags) -> bool,
    table: &'static ProtocolCommandTable,
}

/// Layers in precedence order, lowest first.
static LAYERS: [Layer; 8] = [
    Layer {
        applies: |f| f.mobile || f.dialect == Dialect::Legacy,
        table: &JSONWP,
    },
    Layer {
        applies: |f| f.mobile || f.dialect == Dialect::W3C,
        table: &WEBDRIVER,
    },
    Layer {
        applies: |f| f.mobile,
        table: &MJSONWP,
    },
    Layer {
        applies: |f| f.mobile,
        table: &APPIUM,
    },
    Layer {
        applies: |f| f.chrome,
        table: &CHROMIUM,
    },
    Layer {
        applies: |f| f.firefox,
        table: &GECKO,
    },
    Layer {
        applies: |f| f.sauce,
        table: &SAUCELABS,
    },
    Layer {
        applies: |f| f.selenium_standalone,
        table: &SELENIUM,
    },
];

/// Returns the tables selected by `flags`, lowest precedence first.
#[must_use]
pub fn select_tables(flags: &FeatureFlags) -> Vec<&'static ProtocolCommandTable> {
    LAYERS
        .iter()
        .filter(|layer| (layer.applies)(flags))
        .map(|layer| layer.table)
        .collect()
}

// ============================================================================
// Merge
// ============================================================================

/// One `(endpoint, method)` entry of a merged table.
#[derive(Debug, Clone, Copy)]
struct MergedEntry {
    method: HttpMethod,
    descriptor: &'static CommandDescriptor,
    /// Index of the layer that supplied the entry.
    layer: usize,
}

#[derive(Debug)]
struct MergedEndpoint {
    path: &'static str,
    methods: Vec<MergedEntry>,
}

/// Tables folded into one, endpoints in first-seen order.
#[derive(Debug, Default)]
struct MergedTable {
    endpoints: Vec<MergedEndpoint>,
    index: FxHashMap<&'static str, usize>,
}

impl MergedTable {
    fn merge(&mut self, layer: usize, table: &'static ProtocolCommandTable) {
        for endpoint in table.endpoints {
            let slot = *self.index.entry(endpoint.path).or_insert_with(|| {
                self.endpoints.push(MergedEndpoint {
                    path: endpoint.path,
                    methods: Vec::new(),
                });
                self.endpoints.len() - 1
            });
            let methods = &mut self.endpoints[slot].methods;

            for (method, descriptor) in endpoint.methods {
                let entry = MergedEntry {
                    method: *method,
                    descriptor,
                    layer,
                };
                match methods.iter_mut().find(|e| e.method == *method) {
                    Some(existing) => *existing = entry,
                    None => methods.push(entry),
                }
            }
        }
    }
}

// ============================================================================
// Build
// ============================================================================

/// Builds the command surface for a session with the given flags.
///
/// Never fails: flags that match no extension simply yield fewer commands.
#[must_use]
pub fn build_command_surface(flags: &FeatureFlags) -> CommandSurface {
    let tables = select_tables(flags);
    let mut surface = build_from_tables(&tables, flags.selenium_standalone);
    surface.flags = *flags;
    surface
}

/// Builds a command surface from an explicit table list, lowest precedence first.
///
/// `double_encode` is the grid flag stored on every binding.
#[must_use]
pub fn build_from_tables(
    tables: &[&'static ProtocolCommandTable],
    double_encode: bool,
) -> CommandSurface {
    let mut merged = MergedTable::default();
    for (layer, &table) in tables.iter().enumerate() {
        merged.merge(layer, table);
    }

    let mut entries: Vec<(&'static str, MergedEntry)> = merged
        .endpoints
        .iter()
        .flat_map(|endpoint| endpoint.methods.iter().map(|entry| (endpoint.path, *entry)))
        .collect();
    // Stable: within a layer, merged order decides.
    entries.sort_by_key(|(_, entry)| entry.layer);

    let mut commands = FxHashMap::default();
    for (endpoint, entry) in entries {
        let binding = CommandBinding {
            method: entry.method,
            endpoint,
            descriptor: entry.descriptor,
            double_encode,
            source: tables[entry.layer].name,
        };
        if let Some(previous) = commands.insert(entry.descriptor.command, binding) {
            debug!(
                command = entry.descriptor.command,
                from = previous.source,
                to = binding.source,
                "Command overridden"
            );
        }
    }

    debug!(
        tables = ?tables.iter().map(|t| t.name).collect::<Vec<_>>(),
        commands = commands.len(),
        "Built command surface"
    );

    CommandSurface {
        commands,
        flags: FeatureFlags::default(),
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    use crate::protocol::command::{Endpoint, Parameter};

    static BASE: ProtocolCommandTable = ProtocolCommandTable {
        name: "base",
        endpoints: &[
            Endpoint {
                path: "/session/:sessionId/a",
                methods: &[
                    (
                        HttpMethod::Get,
                        CommandDescriptor {
                            command: "getA",
                            variables: &[],
                            parameters: &[],
                            is_hub_command: false,
                        },
                    ),
                    (
                        HttpMethod::Post,
                        CommandDescriptor {
                            command: "setA",
                            variables: &[],
                            parameters: &[Parameter {
                                name: "a",
                                ty: "string",
                                required: true,
                            }],
                            is_hub_command: false,
                        },
                    ),
                ],
            },
            Endpoint {
                path: "/session/:sessionId/shared",
                methods: &[(
                    HttpMethod::Get,
                    CommandDescriptor {
                        command: "shared",
                        variables: &[],
                        parameters: &[],
                        is_hub_command: false,
                    },
                )],
            },
        ],
    };

    static OVERRIDE: ProtocolCommandTable = ProtocolCommandTable {
        name: "override",
        endpoints: &[
            Endpoint {
                path: "/session/:sessionId/a",
                methods: &[(
                    HttpMethod::Get,
                    CommandDescriptor {
                        command: "getAOverride",
                        variables: &[],
                        parameters: &[],
                        is_hub_command: false,
                    },
                )],
            },
            Endpoint {
                path: "/session/:sessionId/vendor/shared",
                methods: &[(
                    HttpMethod::Post,
                    CommandDescriptor {
                        command: "shared",
                        variables: &[],
                        parameters: &[],
                        is_hub_command: false,
                    },
                )],
            },
        ],
    };

    fn names(flags: FeatureFlags) -> Vec<&'static str> {
        select_tables(&flags).iter().map(|t| t.name).collect()
    }

    #[test]
    fn test_select_base_layer() {
        assert_eq!(names(FeatureFlags::new(Dialect::W3C)), ["webdriver"]);
        assert_eq!(names(FeatureFlags::new(Dialect::Legacy)), ["jsonwp"]);
        assert_eq!(
            names(FeatureFlags::new(Dialect::W3C).with_mobile()),
            ["jsonwp", "webdriver", "mjsonwp", "appium"]
        );
        assert_eq!(
            names(FeatureFlags::new(Dialect::Legacy).with_mobile()),
            ["jsonwp", "webdriver", "mjsonwp", "appium"]
        );
    }

    #[test]
    fn test_select_all_extensions() {
        let flags = FeatureFlags::new(Dialect::W3C)
            .with_chrome()
            .with_firefox()
            .with_sauce()
            .with_selenium_standalone();

        assert_eq!(
            names(flags),
            ["webdriver", "chromium", "gecko", "saucelabs", "selenium"]
        );
    }

    #[test]
    fn test_endpoint_method_collision_replaced() {
        let surface = build_from_tables(&[&BASE, &OVERRIDE], false);

        // GET /a was replaced, so the base name no longer exists.
        assert!(surface.get("getA").is_none());
        let get_a = surface.get("getAOverride").expect("override present");
        assert_eq!(get_a.endpoint, "/session/:sessionId/a");
        assert_eq!(get_a.source, "override");

        // POST /a survived the merge.
        assert_eq!(surface.get("setA").map(|b| b.source), Some("base"));
    }

    #[test]
    fn test_name_collision_last_layer_wins() {
        let surface = build_from_tables(&[&BASE, &OVERRIDE], false);
        let shared = surface.get("shared").expect("shared present");
        assert_eq!(shared.source, "override");
        assert_eq!(shared.method, HttpMethod::Post);

        let reversed = build_from_tables(&[&OVERRIDE, &BASE], false);
        let shared = reversed.get("shared").expect("shared present");
        assert_eq!(shared.source, "base");
        assert_eq!(shared.method, HttpMethod::Get);
    }

    #[test]
    fn test_grid_flag_propagates() {
        let surface = build_command_surface(
            &FeatureFlags::new(Dialect::W3C).with_selenium_standalone(),
        );
        assert!(surface.iter().all(|(_, binding)| binding.double_encode));

        let desktop = build_command_surface(&FeatureFlags::new(Dialect::W3C));
        assert!(desktop.iter().all(|(_, binding)| !binding.double_encode));
    }

    #[test]
    fn test_mobile_base_layer_differs_from_legacy() {
        let legacy = build_command_surface(&FeatureFlags::new(Dialect::Legacy));
        let mobile = build_command_surface(&FeatureFlags::new(Dialect::W3C).with_mobile());

        // Legacy base supplies the jsonwp executeScript endpoint...
        assert_eq!(
            legacy.get("executeScript").map(|b| b.endpoint),
            Some("/session/:sessionId/execute")
        );
        // ...while the mobile base layers webdriver on top of it.
        assert_eq!(
            mobile.get("executeScript").map(|b| b.endpoint),
            Some("/session/:sessionId/execute/sync")
        );

        // Mobile keeps legacy-only commands such as geolocation.
        assert!(mobile.contains("getGeoLocation"));
        assert!(!build_command_surface(&FeatureFlags::new(Dialect::W3C)).contains("getGeoLocation"));

        // Mobile extensions only with the mobile flag.
        assert!(mobile.contains("getContexts"));
        assert!(mobile.contains("launchApp"));
        assert!(!legacy.contains("getContexts"));
        let legacy_mobile =
            build_command_surface(&FeatureFlags::new(Dialect::Legacy).with_mobile());
        assert!(legacy_mobile.contains("getContexts"));
    }

    #[test]
    fn test_vendor_override_across_extensions() {
        let surface = build_command_surface(
            &FeatureFlags::new(Dialect::W3C)
                .with_chrome()
                .with_selenium_standalone(),
        );
        let file = surface.get("file").expect("file command");
        assert_eq!(file.source, "selenium");
        assert_eq!(file.endpoint, "/session/:sessionId/file");
    }

    #[test]
    fn test_surface_records_flags() {
        let flags = FeatureFlags::new(Dialect::W3C).with_firefox();
        let surface = build_command_surface(&flags);
        assert_eq!(surface.flags(), &flags);
        assert!(surface.contains("installAddOn"));
        assert!(!surface.contains("getNetworkConditions"));
    }

    #[test]
    fn test_build_is_deterministic() {
        let flags = FeatureFlags::new(Dialect::W3C)
            .with_mobile()
            .with_chrome()
            .with_sauce();
        let first = build_command_surface(&flags);
        let second = build_command_surface(&flags);

        assert_eq!(first.names(), second.names());
        for name in first.names() {
            assert_eq!(first.get(name), second.get(name));
        }
    }
}
