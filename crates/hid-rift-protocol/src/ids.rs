//! Report identifiers, opaque vendor commands and USB identifiers.
//!
//! # Sources
//!
//! Feature and interrupt report ids follow the OpenHMD Oculus Rift driver
//! (`rift.h` / `packet.c`), which reverse-engineered them from DK1/DK2 traffic.
//! The two vendor command sequences are used with Pimax tracker boards, which
//! speak the same report set behind an STMicroelectronics vendor id. Their
//! field meanings are not established and they must be sent byte-for-byte.

/// Feature report ids (the first byte of every feature report).
pub mod feature_ids {
    /// Sensor configuration: flags, packet interval, keep-alive interval.
    pub const SENSOR_CONFIG: u8 = 2;
    /// Accelerometer / gyroscope / magnetometer scale factors.
    pub const RANGE: u8 = 4;
    /// Keep-alive command.
    pub const KEEP_ALIVE: u8 = 8;
    /// Panel resolution, physical size and lens geometry.
    pub const DISPLAY_INFO: u8 = 9;
    /// Component enable mask (DK2 and later).
    pub const ENABLE_COMPONENTS: u8 = 0x1D;
}

/// Interrupt report ids.
pub mod interrupt_ids {
    /// Generation 1 (DK1) tracker message: up to 3 samples.
    pub const TRACKER_GEN1: u8 = 1;
    /// Generation 2 (DK2) tracker message: up to 2 samples.
    pub const TRACKER_GEN2: u8 = 11;
}

/// Undocumented vendor command sequences, reproduced bit-for-bit.
pub mod vendor_commands {
    /// "Set streaming parameters" command.
    pub const STREAMING_PARAMETERS: [u8; 7] = [0x02, 0x00, 0x00, 0x20, 0x01, 0xE8, 0x03];
    /// Periodic ping that keeps the device streaming.
    pub const PING: [u8; 6] = [0x11, 0x00, 0x00, 0x0B, 0x10, 0x27];
}

/// Oculus VR USB vendor id.
pub const OCULUS_VENDOR_ID: u16 = 0x2833;
/// STMicroelectronics vendor id used by Pimax tracker boards.
pub const STM_VENDOR_ID: u16 = 0x0483;

/// USB product ids, paired with the vendor ids above in [`is_tracker_device`].
pub mod product_ids {
    /// Rift DK1 (`2833:0001`).
    pub const RIFT_DK1: u16 = 0x0001;
    /// Rift DK2 (`2833:0021`).
    pub const RIFT_DK2: u16 = 0x0021;
    /// Pimax tracker board (`0483:0021`).
    pub const PIMAX_TRACKER: u16 = 0x0021;
}

/// `true` for the vendor/product pairs known to speak this report set.
pub fn is_tracker_device(vendor_id: u16, product_id: u16) -> bool {
    matches!(
        (vendor_id, product_id),
        (OCULUS_VENDOR_ID, product_ids::RIFT_DK1)
            | (OCULUS_VENDOR_ID, product_ids::RIFT_DK2)
            | (STM_VENDOR_ID, product_ids::PIMAX_TRACKER)
    )
}
