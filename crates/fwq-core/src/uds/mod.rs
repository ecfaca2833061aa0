//! UDS (ISO 14229) and OBD-II protocol constants
//!
//! Only the identifiers needed to build firmware and VIN queries live here.

/// Offset added to a request's service id to form its positive response id
pub const POSITIVE_RESPONSE_OFFSET: u8 = 0x40;

/// Positive response service id for a request service id
pub const fn positive_response(service_id: u8) -> u8 {
    service_id + POSITIVE_RESPONSE_OFFSET
}

/// Standard UDS service ID constants
pub mod service_id {
    pub const DIAGNOSTIC_SESSION_CONTROL: u8 = 0x10;
    pub const ECU_RESET: u8 = 0x11;
    pub const CLEAR_DIAGNOSTIC_INFO: u8 = 0x14;
    pub const READ_DTC_INFO: u8 = 0x19;
    pub const READ_DATA_BY_ID: u8 = 0x22;
    pub const SECURITY_ACCESS: u8 = 0x27;
    pub const COMMUNICATION_CONTROL: u8 = 0x28;
    pub const WRITE_DATA_BY_ID: u8 = 0x2E;
    pub const ROUTINE_CONTROL: u8 = 0x31;
    pub const TESTER_PRESENT: u8 = 0x3E;
    pub const NEGATIVE_RESPONSE: u8 = 0x7F;
}

/// DiagnosticSessionControl (0x10) session types
pub mod session_type {
    /// Default session
    pub const DEFAULT: u8 = 0x01;
    /// Programming session
    pub const PROGRAMMING: u8 = 0x02;
    /// Extended diagnostic session
    pub const EXTENDED_DIAGNOSTIC: u8 = 0x03;
    /// Safety system diagnostic session
    pub const SAFETY_SYSTEM_DIAGNOSTIC: u8 = 0x04;
}

/// Standard UDS Data Identifiers (ISO 14229-1 Annex C)
pub mod standard_did {
    // Boot / Software Identification
    pub const BOOT_SOFTWARE_ID: u16 = 0xF180;
    pub const APPLICATION_SOFTWARE_ID: u16 = 0xF181;
    pub const APPLICATION_DATA_ID: u16 = 0xF182;

    // Identification
    pub const SPARE_PART_NUMBER: u16 = 0xF187;
    pub const VEHICLE_MANUFACTURER_ECU_SOFTWARE_NUMBER: u16 = 0xF188;
    pub const ECU_SOFTWARE_VERSION: u16 = 0xF189;
    pub const SYSTEM_SUPPLIER_ID: u16 = 0xF18A;

    // Vehicle / Hardware
    pub const VIN: u16 = 0xF190;
    pub const ECU_HARDWARE_NUMBER: u16 = 0xF191;
    pub const SUPPLIER_SW_NUMBER: u16 = 0xF194;
    pub const SUPPLIER_SW_VERSION: u16 = 0xF195;
}

/// OBD-II (SAE J1979) modes and PIDs used for identification
pub mod obd {
    /// Mode 09: Request vehicle information
    pub const MODE_VEHICLE_INFO: u8 = 0x09;
    /// Mode 09 PID 02: Vehicle Identification Number
    pub const PID_VIN: u8 = 0x02;
    /// Mode 09 PID 04: Calibration ID
    pub const PID_CALIBRATION_ID: u8 = 0x04;
}
