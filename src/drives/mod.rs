// Drive discovery module
//
// - classifier.rs: pure removability / EFI / boot-disk decisions
// - enumerator.rs: strategy fallback chain producing Drive snapshots
// - sip.rs: System Integrity Protection status

pub mod classifier;
pub mod enumerator;
pub mod sip;


pub use classifier::{
    assess_removable, classify_boot_device, classify_efi, classify_removable, is_fat_family,
    resolve_boot_disks,
};
pub use enumerator::{DeviceEnumerator, EnumerationStrategy};
pub use sip::SipStatus;
