//! ECU identity types

use std::fmt;
use std::str::FromStr;

use bytes::Bytes;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::FwQueryError;

/// Logical ECU kind
///
/// Serialized in camelCase; parsing ignores case.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum EcuKind {
    Eps,
    Abs,
    FwdRadar,
    FwdCamera,
    Engine,
    Unknown,
    Transmission,
    Hybrid,
    Srs,
    Gateway,
    Hud,
    CombinationMeter,
    Vsa,
    ProgrammedFuelInjection,
    ElectricBrakeBooster,
    ShiftByWire,
    Dsu,
    Adas,
    CornerRadar,
    Hvac,
    ParkingAdas,
    Epb,
    Telematics,
    Body,
}

impl EcuKind {
    pub const ALL: &'static [EcuKind] = &[
        EcuKind::Eps,
        EcuKind::Abs,
        EcuKind::FwdRadar,
        EcuKind::FwdCamera,
        EcuKind::Engine,
        EcuKind::Unknown,
        EcuKind::Transmission,
        EcuKind::Hybrid,
        EcuKind::Srs,
        EcuKind::Gateway,
        EcuKind::Hud,
        EcuKind::CombinationMeter,
        EcuKind::Vsa,
        EcuKind::ProgrammedFuelInjection,
        EcuKind::ElectricBrakeBooster,
        EcuKind::ShiftByWire,
        EcuKind::Dsu,
        EcuKind::Adas,
        EcuKind::CornerRadar,
        EcuKind::Hvac,
        EcuKind::ParkingAdas,
        EcuKind::Epb,
        EcuKind::Telematics,
        EcuKind::Body,
    ];

    /// Name as written in database files
    pub fn as_str(&self) -> &'static str {
        match self {
            EcuKind::Eps => "eps",
            EcuKind::Abs => "abs",
            EcuKind::FwdRadar => "fwdRadar",
            EcuKind::FwdCamera => "fwdCamera",
            EcuKind::Engine => "engine",
            EcuKind::Unknown => "unknown",
            EcuKind::Transmission => "transmission",
            EcuKind::Hybrid => "hybrid",
            EcuKind::Srs => "srs",
            EcuKind::Gateway => "gateway",
            EcuKind::Hud => "hud",
            EcuKind::CombinationMeter => "combinationMeter",
            EcuKind::Vsa => "vsa",
            EcuKind::ProgrammedFuelInjection => "programmedFuelInjection",
            EcuKind::ElectricBrakeBooster => "electricBrakeBooster",
            EcuKind::ShiftByWire => "shiftByWire",
            EcuKind::Dsu => "dsu",
            EcuKind::Adas => "adas",
            EcuKind::CornerRadar => "cornerRadar",
            EcuKind::Hvac => "hvac",
            EcuKind::ParkingAdas => "parkingAdas",
            EcuKind::Epb => "epb",
            EcuKind::Telematics => "telematics",
            EcuKind::Body => "body",
        }
    }
}

impl fmt::Display for EcuKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EcuKind {
    type Err = FwQueryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        EcuKind::ALL
            .iter()
            .find(|kind| kind.as_str().eq_ignore_ascii_case(s))
            .copied()
            .ok_or_else(|| FwQueryError::UnknownEcuKind(s.to_string()))
    }
}

impl<'de> Deserialize<'de> for EcuKind {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let name = String::deserialize(deserializer)?;
        name.parse().map_err(serde::de::Error::custom)
    }
}

/// Arbitration address of an ECU plus its optional functional sub-address
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EcuAddress {
    /// Transmit (tester -> ECU) arbitration id
    pub addr: u32,
    /// Sub-address for UDS functional addressing
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub_addr: Option<u8>,
}

impl EcuAddress {
    pub fn new(addr: u32, sub_addr: Option<u8>) -> Self {
        Self { addr, sub_addr }
    }

    /// Physically addressed ECU
    pub fn physical(addr: u32) -> Self {
        Self::new(addr, None)
    }

    /// Functionally addressed ECU behind `addr`
    pub fn functional(addr: u32, sub_addr: u8) -> Self {
        Self::new(addr, Some(sub_addr))
    }

    /// Whether this address needs functional addressing (and thus sequential querying)
    pub fn is_functional(&self) -> bool {
        self.sub_addr.is_some()
    }

    /// Expected response arbitration id
    pub fn rx_addr(&self, rx_offset: u32) -> u32 {
        self.addr.wrapping_add(rx_offset)
    }
}

impl fmt::Display for EcuAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.sub_addr {
            Some(sub) => write!(f, "0x{:x}/0x{:02x}", self.addr, sub),
            None => write!(f, "0x{:x}", self.addr),
        }
    }
}

/// An ECU in the firmware database: kind plus address
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EcuType {
    pub kind: EcuKind,
    pub addr: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub_addr: Option<u8>,
}

impl EcuType {
    pub fn new(kind: EcuKind, addr: u32, sub_addr: Option<u8>) -> Self {
        Self {
            kind,
            addr,
            sub_addr,
        }
    }

    pub fn address(&self) -> EcuAddress {
        EcuAddress::new(self.addr, self.sub_addr)
    }
}

impl fmt::Display for EcuType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} @ {}", self.kind, self.address())
    }
}

/// Firmware version string as reported by an ECU
///
/// Versions are raw bytes; most are ASCII but padding and prefix bytes
/// outside the printable range are common.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FwVersion(Bytes);

impl FwVersion {
    pub fn new(bytes: impl Into<Bytes>) -> Self {
        Self(bytes.into())
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn to_hex(&self) -> String {
        hex::encode(&self.0)
    }
}

impl From<&'static [u8]> for FwVersion {
    fn from(bytes: &'static [u8]) -> Self {
        Self(Bytes::from_static(bytes))
    }
}

impl From<Bytes> for FwVersion {
    fn from(bytes: Bytes) -> Self {
        Self(bytes)
    }
}

impl fmt::Debug for FwVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.0, f)
    }
}

impl fmt::Display for FwVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for &b in self.0.iter() {
            if b.is_ascii_graphic() || b == b' ' {
                write!(f, "{}", b as char)?;
            } else {
                write!(f, "\\x{:02x}", b)?;
            }
        }
        Ok(())
    }
}

impl Serialize for FwVersion {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}
