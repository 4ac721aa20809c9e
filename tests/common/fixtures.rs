/// Captured-style outputs of the disk utilities
///
/// Two machines are modelled:
/// - a simple one with internal `disk0` (boot, EFI at `disk0s1`) and an
///   external USB stick `disk2` whose slot 1 is FAT32
/// - an APFS one where `/` lives on the synthesized container `disk3`
///   backed by `disk0s2`
#[allow(dead_code)]
pub const DISKUTIL_LIST: &str = "\
/dev/disk0 (internal, physical):
   #:                       TYPE NAME                    SIZE       IDENTIFIER
   0:      GUID_partition_scheme                        *500.3 GB   disk0
   1:                        EFI EFI                     209.7 MB   disk0s1
   2:                  Apple_HFS Macintosh HD            499.4 GB   disk0s2
   3:                 Apple_Boot Recovery HD             650.0 MB   disk0s3

/dev/disk2 (external, physical):
   #:                       TYPE NAME                    SIZE       IDENTIFIER
   0:     FDisk_partition_scheme                        *16.0 GB    disk2
   1:                 DOS_FAT_32 OPENCORE                16.0 GB    disk2s1
";

#[allow(dead_code)]
pub const DISKUTIL_LIST_PLIST: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<!DOCTYPE plist PUBLIC "-//Apple//DTD PLIST 1.0//EN" "http://www.apple.com/DTDs/PropertyList-1.0.dtd">
<plist version="1.0">
<dict>
	<key>AllDisks</key>
	<array>
		<string>disk0</string>
		<string>disk0s1</string>
		<string>disk0s2</string>
		<string>disk2</string>
		<string>disk2s1</string>
	</array>
	<key>AllDisksAndPartitions</key>
	<array>
		<dict>
			<key>Content</key>
			<string>GUID_partition_scheme</string>
			<key>DeviceIdentifier</key>
			<string>disk0</string>
			<key>OSInternal</key>
			<false/>
			<key>Partitions</key>
			<array>
				<dict>
					<key>Content</key>
					<string>EFI</string>
					<key>DeviceIdentifier</key>
					<string>disk0s1</string>
					<key>DiskUUID</key>
					<string>6A0F1C2E-5B8D-4E0A-9C3B-1D2E3F4A5B6C</string>
					<key>Size</key>
					<integer>209715200</integer>
					<key>VolumeName</key>
					<string>EFI</string>
				</dict>
				<dict>
					<key>Content</key>
					<string>Apple_HFS</string>
					<key>DeviceIdentifier</key>
					<string>disk0s2</string>
					<key>MountPoint</key>
					<string>/</string>
					<key>Size</key>
					<integer>499418034176</integer>
					<key>VolumeName</key>
					<string>Macintosh HD</string>
				</dict>
			</array>
			<key>Size</key>
			<integer>500277790720</integer>
		</dict>
		<dict>
			<key>Content</key>
			<string>FDisk_partition_scheme</string>
			<key>DeviceIdentifier</key>
			<string>disk2</string>
			<key>OSInternal</key>
			<false/>
			<key>Partitions</key>
			<array>
				<dict>
					<key>Content</key>
					<string>DOS_FAT_32</string>
					<key>DeviceIdentifier</key>
					<string>disk2s1</string>
					<key>Size</key>
					<integer>16008609792</integer>
					<key>VolumeName</key>
					<string>OPENCORE</string>
				</dict>
			</array>
			<key>Size</key>
			<integer>16008609792</integer>
		</dict>
	</array>
	<key>VolumesFromDisks</key>
	<array>
		<string>Macintosh HD</string>
	</array>
	<key>WholeDisks</key>
	<array>
		<string>disk0</string>
		<string>disk2</string>
	</array>
</dict>
</plist>
"#;

/// APFS layout: container `disk3` on `disk0s2`, external stick `disk4`
#[allow(dead_code)]
pub const DISKUTIL_LIST_APFS_JSON: &str = r#"{
  "AllDisksAndPartitions": [
    {
      "DeviceIdentifier": "disk0",
      "Content": "GUID_partition_scheme",
      "Size": 500277790720,
      "Partitions": [
        { "DeviceIdentifier": "disk0s1", "Content": "EFI", "VolumeName": "EFI", "Size": 314572800 },
        { "DeviceIdentifier": "disk0s2", "Content": "Apple_APFS", "Size": 499963174912 }
      ]
    },
    {
      "DeviceIdentifier": "disk3",
      "Size": 499963174912,
      "APFSPhysicalStores": [ { "DeviceIdentifier": "disk0s2" } ],
      "APFSVolumes": [
        { "DeviceIdentifier": "disk3s1", "VolumeName": "Macintosh HD", "MountPoint": "/" },
        { "DeviceIdentifier": "disk3s5", "VolumeName": "Data", "MountPoint": "/System/Volumes/Data" }
      ]
    },
    {
      "DeviceIdentifier": "disk4",
      "Content": "GUID_partition_scheme",
      "Size": 32015679488,
      "Partitions": [
        { "DeviceIdentifier": "disk4s1", "Content": "EFI", "VolumeName": "EFI", "Size": 209715200 },
        { "DeviceIdentifier": "disk4s2", "Content": "Microsoft Basic Data", "VolumeName": "INSTALL", "Size": 31805964288 }
      ]
    }
  ]
}"#;

#[allow(dead_code)]
pub const DF_ROOT_DISK0: &str = "\
Filesystem   512-blocks      Used Available Capacity  iused     ifree %iused  Mounted on
/dev/disk0s2  975425848 412338528 562575320    43%  1520394 4293446885    0%   /
";

#[allow(dead_code)]
pub const DF_ROOT_APFS: &str = "\
Filesystem     512-blocks      Used Available Capacity iused      ifree %iused  Mounted on
/dev/disk3s1s1  976490576  19876200 463297288     5%  403892 2316486440    0%   /
";

#[allow(dead_code)]
pub const INFO_DISK0: &str = "\
   Device Identifier:         disk0
   Device Node:               /dev/disk0
   Whole:                     Yes
   Part of Whole:             disk0
   Device / Media Name:       APPLE SSD SM0512F

   Volume Name:               Not applicable (no file system)
   Mounted:                   Not applicable (no file system)
   File System:               None

   Content (IOContent):       GUID_partition_scheme
   OS Can Be Installed:       No
   Media Type:                Generic
   Protocol:                  SATA
   SMART Status:              Verified

   Disk Size:                 500.3 GB (500277790720 Bytes) (exactly 977105060 512-Byte-Units)
   Device Block Size:         512 Bytes

   Read-Only Media:           No
   Read-Only Volume:          Not applicable (no file system)

   Device Location:           Internal
   Removable Media:           Fixed

   Solid State:               Yes
";

#[allow(dead_code)]
pub const INFO_DISK2: &str = "\
   Device Identifier:         disk2
   Device Node:               /dev/disk2
   Whole:                     Yes
   Part of Whole:             disk2
   Device / Media Name:       SanDisk Ultra Fit

   Volume Name:               Not applicable (no file system)
   Mounted:                   Not applicable (no file system)

   Content (IOContent):       FDisk_partition_scheme
   Protocol:                  USB
   SMART Status:              Not Supported

   Disk Size:                 16.0 GB (16008609792 Bytes) (exactly 31266816 512-Byte-Units)

   Device Location:           External
   Removable Media:           Removable
   Media Removal:             Software-Activated
";

/// `diskutil info` of an unmounted FAT partition
#[allow(dead_code)]
pub fn info_partition_unmounted(id: &str) -> String {
    format!(
        "   Device Identifier:         {id}\n   Device Node:               /dev/{id}\n   Whole:                     No\n   Volume Name:               EFI\n   Mounted:                   No\n   Partition Type:            EFI\n   File System Personality:   MS-DOS FAT32\n   Mount Point:\n",
        id = id
    )
}

/// `diskutil info` of a partition mounted at `mount_point`
#[allow(dead_code)]
pub fn info_partition_mounted(id: &str, mount_point: &str) -> String {
    format!(
        "   Device Identifier:         {id}\n   Device Node:               /dev/{id}\n   Volume Name:               EFI\n   Mounted:                   Yes\n   Mount Point:               {mp}\n",
        id = id,
        mp = mount_point
    )
}

/// BSD `mount` output with the root volume plus any extra lines
#[allow(dead_code)]
pub fn mount_table(extra: &[&str]) -> String {
    let mut table = String::from(
        "/dev/disk0s2 on / (hfs, local, journaled)\ndevfs on /dev (devfs, local, nobrowse)\n",
    );
    for line in extra {
        table.push_str(line);
        table.push('\n');
    }
    table
}

#[allow(dead_code)]
pub const SYSTEM_PROFILER_USB: &str = "\
USB:

    USB 3.0 Bus:

      Host Controller Driver: AppleUSBXHCISPT
      PCI Device ID: 0xa12f

        Ultra Fit:

          Product ID: 0x5583
          Vendor ID: 0x0781  (SanDisk Corporation)
          Speed: Up to 5 Gb/s
          Manufacturer: SanDisk
          Location ID: 0x14100000 / 1
          Media:
            Ultra Fit:
              Capacity: 16.01 GB (16,008,609,792 bytes)
              Removable Media: Yes
              BSD Name: disk5
              Partition Map Type: MBR (Master Boot Record)
              S.M.A.R.T. status: Not Supported
              Volumes:
                STICK:
                  Capacity: 16.01 GB (16,008,609,792 bytes)
                  File System: MS-DOS FAT32
                  BSD Name: disk5s1
                  Content: DOS_FAT_32
";
