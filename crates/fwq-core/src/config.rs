//! Firmware query database files
//!
//! A database file declares the query templates of a brand and the known
//! firmware versions of its models. Byte strings are hex ("22f188") or the
//! name of a standard query ("UDS_VERSION_REQUEST"); addresses may be
//! integers or hex strings.
//!
//! ```toml
//! [[requests]]
//! request = ["TESTER_PRESENT_REQUEST", "UDS_VERSION_REQUEST"]
//! response = ["TESTER_PRESENT_RESPONSE", "UDS_VERSION_RESPONSE"]
//! whitelist_ecus = ["engine", "eps"]
//! bus = 0
//! auxiliary = true
//!
//! [non_essential_ecus]
//! eps = ["MODEL_B"]
//!
//! [[extra_ecus]]
//! kind = "adas"
//! addr = "0x730"
//!
//! [[models]]
//! name = "MODEL_A"
//!
//! [[models.ecus]]
//! kind = "engine"
//! addr = "0x7e0"
//! versions = ["ENG-1.00", { hex = "f100454e47" }]
//! ```

use std::collections::{BTreeSet, HashMap};
use std::path::Path;

use bytes::Bytes;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::ecu::{EcuKind, EcuType, FwVersion};
use crate::error::{parse_hex_bytes, parse_hex_u32, FwQueryError, FwQueryResult};
use crate::plan::{FwQueryConfig, FwVersionDb};
use crate::queries;
use crate::request::{Request, AUXILIARY_BUS_OFFSET, DEFAULT_BUS, DEFAULT_RX_OFFSET};

/// On-disk firmware query database
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FwQueryConfigFile {
    /// Query templates, in execution order
    #[serde(default)]
    pub requests: Vec<RequestConfig>,
    /// ECU kind -> models on which that ECU may be missing
    #[serde(default)]
    pub non_essential_ecus: IndexMap<String, Vec<String>>,
    /// ECUs queried for data collection only
    #[serde(default)]
    pub extra_ecus: Vec<EcuConfig>,
    /// Known firmware per model
    #[serde(default)]
    pub models: Vec<ModelConfig>,
}

/// Query template declaration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestConfig {
    /// Request steps (hex or catalog name)
    pub request: Vec<String>,
    /// Expected response prefixes (hex or catalog name)
    pub response: Vec<String>,
    /// ECU kinds to query (empty = all)
    #[serde(default)]
    pub whitelist_ecus: Vec<EcuKind>,
    /// Response id offset from the transmit id
    #[serde(default = "default_rx_offset")]
    pub rx_offset: HexOrInt,
    /// Bus index
    #[serde(default = "default_bus")]
    pub bus: u8,
    /// Duplicate onto the auxiliary transport (bus + 4)
    #[serde(default)]
    pub auxiliary: bool,
    /// Responses are for data collection only
    #[serde(default)]
    pub logging: bool,
    /// Transport must enable OBD multiplexing
    #[serde(default = "default_true")]
    pub obd_multiplexing: bool,
}

fn default_rx_offset() -> HexOrInt {
    HexOrInt::Int(DEFAULT_RX_OFFSET)
}

fn default_bus() -> u8 {
    DEFAULT_BUS
}

fn default_true() -> bool {
    true
}

/// ECU declaration
///
/// `versions` is only meaningful inside a model; it is ignored for extra ECUs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EcuConfig {
    pub kind: EcuKind,
    pub addr: HexOrInt,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub_addr: Option<HexOrInt>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub versions: Vec<FwVersionConfig>,
}

/// Model declaration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelConfig {
    pub name: String,
    #[serde(default)]
    pub ecus: Vec<EcuConfig>,
}

/// Number written as an integer or a hex string ("0x7e0")
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum HexOrInt {
    Int(u32),
    Hex(String),
}

impl HexOrInt {
    fn to_u32(&self, field: &'static str) -> FwQueryResult<u32> {
        match self {
            HexOrInt::Int(n) => Ok(*n),
            HexOrInt::Hex(s) => parse_hex_u32(field, s),
        }
    }

    fn to_u8(&self, field: &'static str) -> FwQueryResult<u8> {
        let n = self.to_u32(field)?;
        u8::try_from(n).map_err(|_| FwQueryError::InvalidNumber {
            field,
            value: n.to_string(),
        })
    }
}

/// Firmware version: literal text, or `{ hex = "..." }` for raw bytes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FwVersionConfig {
    Text(String),
    Hex { hex: String },
}

impl FwVersionConfig {
    fn to_version(&self) -> FwQueryResult<FwVersion> {
        match self {
            FwVersionConfig::Text(s) => Ok(FwVersion::new(s.clone().into_bytes())),
            FwVersionConfig::Hex { hex } => Ok(FwVersion::new(parse_hex_bytes(hex)?)),
        }
    }
}

impl FwQueryConfigFile {
    /// Load a database from a TOML file
    pub fn load(path: impl AsRef<Path>) -> FwQueryResult<Self> {
        let path = path.as_ref();
        debug!(path = %path.display(), "Loading firmware query database");
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Parse a database from TOML text
    pub fn from_toml_str(content: &str) -> FwQueryResult<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Resolve byte strings and addresses and build the query config
    pub fn into_config(self) -> FwQueryResult<FwQueryConfig> {
        let requests = self
            .requests
            .iter()
            .enumerate()
            .map(|(index, req)| req.to_request(index))
            .collect::<FwQueryResult<Vec<_>>>()?;

        let mut non_essential_ecus: HashMap<EcuKind, BTreeSet<String>> = HashMap::new();
        for (kind, models) in &self.non_essential_ecus {
            let kind: EcuKind = kind.parse()?;
            non_essential_ecus
                .entry(kind)
                .or_default()
                .extend(models.iter().cloned());
        }

        let extra_ecus = self
            .extra_ecus
            .iter()
            .map(EcuConfig::to_ecu_type)
            .collect::<FwQueryResult<Vec<_>>>()?;

        let mut fw_versions = FwVersionDb::new();
        for model in &self.models {
            let ecus = fw_versions.entry(model.name.clone()).or_default();
            for ecu in &model.ecus {
                let versions = ecu
                    .versions
                    .iter()
                    .map(FwVersionConfig::to_version)
                    .collect::<FwQueryResult<Vec<_>>>()?;
                ecus.entry(ecu.to_ecu_type()?)
                    .or_default()
                    .extend(versions);
            }
        }

        info!(
            requests = requests.len(),
            models = fw_versions.len(),
            extra_ecus = extra_ecus.len(),
            "Loaded firmware query database"
        );

        Ok(FwQueryConfig::new(requests, fw_versions)
            .with_non_essential_ecus(non_essential_ecus)
            .with_extra_ecus(extra_ecus))
    }
}

impl RequestConfig {
    fn to_request(&self, index: usize) -> FwQueryResult<Request> {
        if self.auxiliary && self.bus > u8::MAX - AUXILIARY_BUS_OFFSET {
            return Err(FwQueryError::InvalidNumber {
                field: "bus",
                value: format!("{} (auxiliary copy would exceed {})", self.bus, u8::MAX),
            });
        }
        let request = resolve_steps(&self.request, index, "request")?;
        let response = resolve_steps(&self.response, index, "response")?;
        Ok(Request::new(request, response)
            .with_whitelist(self.whitelist_ecus.iter().copied())
            .with_rx_offset(self.rx_offset.to_u32("rx_offset")?)
            .with_bus(self.bus)
            .with_auxiliary(self.auxiliary)
            .with_logging(self.logging)
            .with_obd_multiplexing(self.obd_multiplexing))
    }
}

impl EcuConfig {
    fn to_ecu_type(&self) -> FwQueryResult<EcuType> {
        let sub_addr = self
            .sub_addr
            .as_ref()
            .map(|s| s.to_u8("sub_addr"))
            .transpose()?;
        Ok(EcuType::new(self.kind, self.addr.to_u32("addr")?, sub_addr))
    }
}

/// Resolve request/response steps: catalog names first, then hex
fn resolve_steps(steps: &[String], index: usize, field: &'static str) -> FwQueryResult<Vec<Bytes>> {
    steps
        .iter()
        .map(|step| {
            let bytes = match queries::lookup(step) {
                Some(bytes) => Bytes::from_static(bytes),
                None => Bytes::from(parse_hex_bytes(step)?),
            };
            if bytes.is_empty() {
                return Err(FwQueryError::EmptyStep { index, field });
            }
            Ok(bytes)
        })
        .collect()
}

impl FwQueryConfig {
    /// Load a query config from a TOML database file
    pub fn load(path: impl AsRef<Path>) -> FwQueryResult<Self> {
        FwQueryConfigFile::load(path)?.into_config()
    }

    /// Build a query config from TOML database text
    pub fn from_toml_str(content: &str) -> FwQueryResult<Self> {
        FwQueryConfigFile::from_toml_str(content)?.into_config()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ecu::EcuAddress;
    use pretty_assertions::assert_eq;

    const DATABASE: &str = r#"
[[requests]]
request = ["TESTER_PRESENT_REQUEST", "UDS_VERSION_REQUEST"]
response = ["TESTER_PRESENT_RESPONSE", "62f181"]
whitelist_ecus = ["engine", "fwdCamera"]
bus = 0
auxiliary = true

[[requests]]
request = ["0x09 04"]
response = ["OBD_VERSION_RESPONSE"]
rx_offset = "0x10"
logging = true
obd_multiplexing = false

[non_essential_ecus]
eps = ["MODEL_B"]

[[extra_ecus]]
kind = "adas"
addr = "0x730"
sub_addr = "0x0f"

[[models]]
name = "MODEL_B"

[[models.ecus]]
kind = "engine"
addr = "0x7e0"
versions = ["ENG-2.00"]

[[models]]
name = "MODEL_A"

[[models.ecus]]
kind = "engine"
addr = 2016
versions = ["ENG-1.00", { hex = "f100454e47" }]

[[models.ecus]]
kind = "fwdCamera"
addr = "0x750"
sub_addr = 109
"#;

    #[test]
    fn test_load_requests() {
        let config = FwQueryConfig::from_toml_str(DATABASE).unwrap();
        let requests = config.requests();
        assert_eq!(requests.len(), 3);

        assert_eq!(requests[0].request[1].as_ref(), queries::UDS_VERSION_REQUEST);
        assert_eq!(requests[0].response[1].as_ref(), queries::UDS_VERSION_RESPONSE);
        assert_eq!(requests[0].rx_offset, 0x8);
        assert_eq!(requests[0].whitelist_ecus.len(), 2);

        assert_eq!(requests[1].request[0].as_ref(), queries::OBD_VERSION_REQUEST);
        assert_eq!(requests[1].rx_offset, 0x10);
        assert_eq!(requests[1].bus, 1);
        assert!(requests[1].logging);
        assert!(!requests[1].obd_multiplexing);

        // auxiliary duplicate of the first request
        assert_eq!(requests[2].bus, 4);
        assert_eq!(requests[2].request, requests[0].request);
    }

    #[test]
    fn test_load_database() {
        let config = FwQueryConfig::from_toml_str(DATABASE).unwrap();

        let models: Vec<&str> = config.models().collect();
        assert_eq!(models, vec!["MODEL_B", "MODEL_A"]);

        let engine = EcuType::new(EcuKind::Engine, 0x7E0, None);
        let model_a = config.fw_versions_for("MODEL_A").unwrap();
        assert_eq!(
            model_a[&engine],
            vec![
                FwVersion::from(&b"ENG-1.00"[..]),
                FwVersion::from(&b"\xf1\x00ENG"[..]),
            ]
        );

        assert_eq!(
            config.ecu_kind_for(0x750, Some(0x6D)),
            Some(EcuKind::FwdCamera)
        );
        assert_eq!(
            config.extra_ecus(),
            &[EcuType::new(EcuKind::Adas, 0x730, Some(0x0F))]
        );
        assert!(!config.is_essential(EcuKind::Eps, "MODEL_B"));
        assert!(config.is_essential(EcuKind::Eps, "MODEL_A"));

        assert_eq!(
            config.address_batches(None),
            vec![
                vec![EcuAddress::physical(0x7E0)],
                vec![EcuAddress::functional(0x750, 0x6D)],
                vec![EcuAddress::functional(0x730, 0x0F)],
            ]
        );
    }

    #[test]
    fn test_empty_database() {
        let config = FwQueryConfig::from_toml_str("").unwrap();
        assert!(config.requests().is_empty());
        assert_eq!(config.address_batches(None), vec![Vec::<EcuAddress>::new()]);
    }

    #[test]
    fn test_invalid_hex() {
        let err = FwQueryConfig::from_toml_str(
            r#"
[[requests]]
request = ["NOT_A_QUERY"]
response = ["62f181"]
"#,
        )
        .unwrap_err();
        assert!(matches!(err, FwQueryError::InvalidHex(s) if s == "NOT_A_QUERY"));
    }

    #[test]
    fn test_empty_step() {
        let err = FwQueryConfig::from_toml_str(
            r#"
[[requests]]
request = ["3e00"]
response = [""]
"#,
        )
        .unwrap_err();
        assert!(matches!(
            err,
            FwQueryError::EmptyStep {
                index: 0,
                field: "response"
            }
        ));
    }

    #[test]
    fn test_sub_addr_out_of_range() {
        let err = FwQueryConfig::from_toml_str(
            r#"
[[extra_ecus]]
kind = "hud"
addr = "0x750"
sub_addr = "0x100"
"#,
        )
        .unwrap_err();
        assert!(matches!(
            err,
            FwQueryError::InvalidNumber {
                field: "sub_addr",
                ..
            }
        ));
    }

    #[test]
    fn test_auxiliary_bus_out_of_range() {
        let err = FwQueryConfig::from_toml_str(
            r#"
[[requests]]
request = ["3e00"]
response = ["7e00"]
bus = 253
auxiliary = true
"#,
        )
        .unwrap_err();
        assert!(matches!(err, FwQueryError::InvalidNumber { field: "bus", .. }));

        // Highest bus whose auxiliary copy still fits
        let config = FwQueryConfig::from_toml_str(
            r#"
[[requests]]
request = ["3e00"]
response = ["7e00"]
bus = 251
auxiliary = true
"#,
        )
        .unwrap();
        let buses: Vec<u8> = config.requests().iter().map(|r| r.bus).collect();
        assert_eq!(buses, vec![251, 255]);
    }

    #[test]
    fn test_kind_names_parse_alike() {
        let config = FwQueryConfig::from_toml_str(
            r#"
[[requests]]
request = ["UDS_VERSION_REQUEST"]
response = ["UDS_VERSION_RESPONSE"]
whitelist_ecus = ["FwdRadar"]

[non_essential_ecus]
FwdRadar = ["MODEL_A"]

[[models]]
name = "MODEL_A"
[[models.ecus]]
kind = "FWDRADAR"
addr = "0x750"
sub_addr = "0x0f"
"#,
        )
        .unwrap();

        assert!(config.requests()[0].applies_to(EcuKind::FwdRadar));
        assert!(!config.is_essential(EcuKind::FwdRadar, "MODEL_A"));
        assert_eq!(config.ecu_kind_for(0x750, Some(0x0F)), Some(EcuKind::FwdRadar));

        let err = FwQueryConfig::from_toml_str(
            r#"
[[requests]]
request = ["UDS_VERSION_REQUEST"]
response = ["UDS_VERSION_RESPONSE"]
whitelist_ecus = ["warpDrive"]
"#,
        )
        .unwrap_err();
        assert!(matches!(err, FwQueryError::Toml(_)));
    }

    #[test]
    fn test_unknown_non_essential_kind() {
        let err = FwQueryConfig::from_toml_str(
            r#"
[non_essential_ecus]
warpDrive = ["MODEL_A"]
"#,
        )
        .unwrap_err();
        assert!(matches!(err, FwQueryError::UnknownEcuKind(k) if k == "warpDrive"));
    }

    #[test]
    fn test_toml_syntax_error() {
        let err = FwQueryConfig::from_toml_str("[[requests]\n").unwrap_err();
        assert!(matches!(err, FwQueryError::Toml(_)));
    }

    #[test]
    fn test_duplicate_entries_merge() {
        let config = FwQueryConfig::from_toml_str(
            r#"
[[models]]
name = "MODEL_A"
[[models.ecus]]
kind = "eps"
addr = "0x7a1"
versions = ["EPS-1"]
[[models.ecus]]
kind = "eps"
addr = "0x7a1"
versions = ["EPS-2"]

[[models]]
name = "MODEL_A"
[[models.ecus]]
kind = "abs"
addr = "0x7b0"
"#,
        )
        .unwrap();

        assert_eq!(config.models().count(), 1);
        let model = config.fw_versions_for("MODEL_A").unwrap();
        assert_eq!(model.len(), 2);
        assert_eq!(model[&EcuType::new(EcuKind::Eps, 0x7A1, None)].len(), 2);
        assert_eq!(
            config.address_batches(None),
            vec![vec![
                EcuAddress::physical(0x7A1),
                EcuAddress::physical(0x7B0)
            ]]
        );
    }
}
