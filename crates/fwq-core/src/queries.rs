//! Standard diagnostic query catalog
//!
//! Request/response byte patterns for the exchanges used to identify ECU
//! firmware and read the VIN. Every response starts with the request's
//! service id plus [`POSITIVE_RESPONSE_OFFSET`](crate::uds::POSITIVE_RESPONSE_OFFSET)
//! and echoes the sub-function or big-endian data identifier.
//!
//! All values are `&'static [u8]`; templates that need owned storage wrap
//! them with [`bytes::Bytes::from_static`].

use crate::uds::{obd, positive_response, service_id, session_type, standard_did};

const fn read_did(did: u16) -> [u8; 3] {
    let did = did.to_be_bytes();
    [service_id::READ_DATA_BY_ID, did[0], did[1]]
}

const fn read_did_response(did: u16) -> [u8; 3] {
    let did = did.to_be_bytes();
    [positive_response(service_id::READ_DATA_BY_ID), did[0], did[1]]
}

/// P2 / P2* server timing reported in a session control response (50ms / 5000ms)
const SESSION_TIMING: [u8; 4] = [0x00, 0x32, 0x01, 0xF4];

const fn session_response(session: u8) -> [u8; 6] {
    [
        positive_response(service_id::DIAGNOSTIC_SESSION_CONTROL),
        session,
        SESSION_TIMING[0],
        SESSION_TIMING[1],
        SESSION_TIMING[2],
        SESSION_TIMING[3],
    ]
}

// FW queries

pub const TESTER_PRESENT_REQUEST: &[u8] = &[service_id::TESTER_PRESENT, 0x00];
pub const TESTER_PRESENT_RESPONSE: &[u8] = &[positive_response(service_id::TESTER_PRESENT), 0x00];

pub const SHORT_TESTER_PRESENT_REQUEST: &[u8] = &[service_id::TESTER_PRESENT];
pub const SHORT_TESTER_PRESENT_RESPONSE: &[u8] = &[positive_response(service_id::TESTER_PRESENT)];

pub const DEFAULT_DIAGNOSTIC_REQUEST: &[u8] =
    &[service_id::DIAGNOSTIC_SESSION_CONTROL, session_type::DEFAULT];
pub const DEFAULT_DIAGNOSTIC_RESPONSE: &[u8] = &session_response(session_type::DEFAULT);

pub const EXTENDED_DIAGNOSTIC_REQUEST: &[u8] = &[
    service_id::DIAGNOSTIC_SESSION_CONTROL,
    session_type::EXTENDED_DIAGNOSTIC,
];
pub const EXTENDED_DIAGNOSTIC_RESPONSE: &[u8] =
    &session_response(session_type::EXTENDED_DIAGNOSTIC);

pub const MANUFACTURER_SOFTWARE_VERSION_REQUEST: &[u8] =
    &read_did(standard_did::VEHICLE_MANUFACTURER_ECU_SOFTWARE_NUMBER);
pub const MANUFACTURER_SOFTWARE_VERSION_RESPONSE: &[u8] =
    &read_did_response(standard_did::VEHICLE_MANUFACTURER_ECU_SOFTWARE_NUMBER);

pub const UDS_VERSION_REQUEST: &[u8] = &read_did(standard_did::APPLICATION_SOFTWARE_ID);
pub const UDS_VERSION_RESPONSE: &[u8] = &read_did_response(standard_did::APPLICATION_SOFTWARE_ID);

pub const OBD_VERSION_REQUEST: &[u8] = &[obd::MODE_VEHICLE_INFO, obd::PID_CALIBRATION_ID];
pub const OBD_VERSION_RESPONSE: &[u8] = &[
    positive_response(obd::MODE_VEHICLE_INFO),
    obd::PID_CALIBRATION_ID,
];

// VIN queries

pub const OBD_VIN_REQUEST: &[u8] = &[obd::MODE_VEHICLE_INFO, obd::PID_VIN];
/// Mode 09 PID 02 response header, including the single-message count byte
pub const OBD_VIN_RESPONSE: &[u8] = &[positive_response(obd::MODE_VEHICLE_INFO), obd::PID_VIN, 0x01];

pub const UDS_VIN_REQUEST: &[u8] = &read_did(standard_did::VIN);
pub const UDS_VIN_RESPONSE: &[u8] = &read_did_response(standard_did::VIN);

/// Named catalog entries: (name, bytes)
pub const CATALOG: &[(&str, &[u8])] = &[
    ("TESTER_PRESENT_REQUEST", TESTER_PRESENT_REQUEST),
    ("TESTER_PRESENT_RESPONSE", TESTER_PRESENT_RESPONSE),
    ("SHORT_TESTER_PRESENT_REQUEST", SHORT_TESTER_PRESENT_REQUEST),
    ("SHORT_TESTER_PRESENT_RESPONSE", SHORT_TESTER_PRESENT_RESPONSE),
    ("DEFAULT_DIAGNOSTIC_REQUEST", DEFAULT_DIAGNOSTIC_REQUEST),
    ("DEFAULT_DIAGNOSTIC_RESPONSE", DEFAULT_DIAGNOSTIC_RESPONSE),
    ("EXTENDED_DIAGNOSTIC_REQUEST", EXTENDED_DIAGNOSTIC_REQUEST),
    ("EXTENDED_DIAGNOSTIC_RESPONSE", EXTENDED_DIAGNOSTIC_RESPONSE),
    (
        "MANUFACTURER_SOFTWARE_VERSION_REQUEST",
        MANUFACTURER_SOFTWARE_VERSION_REQUEST,
    ),
    (
        "MANUFACTURER_SOFTWARE_VERSION_RESPONSE",
        MANUFACTURER_SOFTWARE_VERSION_RESPONSE,
    ),
    ("UDS_VERSION_REQUEST", UDS_VERSION_REQUEST),
    ("UDS_VERSION_RESPONSE", UDS_VERSION_RESPONSE),
    ("OBD_VERSION_REQUEST", OBD_VERSION_REQUEST),
    ("OBD_VERSION_RESPONSE", OBD_VERSION_RESPONSE),
    ("OBD_VIN_REQUEST", OBD_VIN_REQUEST),
    ("OBD_VIN_RESPONSE", OBD_VIN_RESPONSE),
    ("UDS_VIN_REQUEST", UDS_VIN_REQUEST),
    ("UDS_VIN_RESPONSE", UDS_VIN_RESPONSE),
];

/// Look up a catalog entry by name (case-insensitive)
pub fn lookup(name: &str) -> Option<&'static [u8]> {
    let name = name.trim();
    CATALOG
        .iter()
        .find(|(n, _)| n.eq_ignore_ascii_case(name))
        .map(|(_, bytes)| *bytes)
}

/// Name of the catalog entry with exactly these bytes, if any
pub fn name_of(bytes: &[u8]) -> Option<&'static str> {
    CATALOG
        .iter()
        .find(|(_, b)| *b == bytes)
        .map(|(name, _)| *name)
}
