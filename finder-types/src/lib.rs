// SPDX-License-Identifier: MIT

//! Finder metadata records from the classic Mac OS File Manager
//! (`ioFlFndrInfo` followed by `ioFlXFndrInfo`), adjusted to use Rust-friendly
//! naming.
//!
//! The same 32 bytes appear in HFS Plus catalog records and in the Finder Info
//! entry of AppleSingle and AppleDouble files. All values are big-endian on
//! disk.
//!
//! Described by TN1150 in [Finder Info](https://developer.apple.com/library/archive/technotes/tn/tn1150.html#FinderInfo)

#![forbid(unsafe_code)]
#![deny(dead_code, unused)]

use core::fmt;

use deku::ctx::Endian;
use deku::prelude::*;
use tartan_bitfield::bitfield;

/// Four bytes, usually printable, identifying a file type or creator
/// application. Stored as raw bytes as there is no guarantee of an encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, DekuRead)]
#[deku(endian = "endian", ctx = "endian: Endian", ctx_default = "Endian::Big")]
#[cfg_attr(feature = "repr_c", repr(C))]
pub struct FourCharCode(pub [u8; 4]);

pub type OsType = FourCharCode;

impl FourCharCode {
    /// The code as a big-endian integer, as the Toolbox would compare it.
    pub fn as_u32(&self) -> u32 {
        u32::from_be_bytes(self.0)
    }

    /// All-zero codes are used by producers that have nothing to say.
    pub fn is_empty(&self) -> bool {
        self.0 == [0u8; 4]
    }
}

impl From<[u8; 4]> for FourCharCode {
    fn from(value: [u8; 4]) -> Self {
        Self(value)
    }
}

impl fmt::Display for FourCharCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for b in self.0 {
            if b.is_ascii_graphic() || b == b' ' {
                write!(f, "{}", b as char)?;
            } else {
                write!(f, "\\x{b:02x}")?;
            }
        }
        Ok(())
    }
}

/// An on-screen point, used for icon placement within the parent window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, DekuRead)]
#[deku(endian = "endian", ctx = "endian: Endian", ctx_default = "Endian::Big")]
#[cfg_attr(feature = "repr_c", repr(C))]
pub struct Point {
    pub v: i16,
    pub h: i16,
}

/// Mask covering the three Label bits of the Finder flags word.
pub const LABEL_MASK: u16 = ((1 << 3) - 1) << 1;

bitfield! {
    // Finder flags (finderFlags, fdFlags and frFlags). Bits 4, 5 and 9 are
    // reserved.
    pub struct FinderFlags(u16) {
        // Files and folders (System 6)
        [0] pub is_on_desk,
        // Files and folders. Label color, see `LabelColor`.
        [1..4] pub color: u8,
        // Files only (Applications only)
        [6] pub is_shared,
        // Files only (Extensions/Control Panels only)
        [7] pub has_no_inits,
        // Files only. Set only by the Finder.
        [8] pub has_been_inited,
        // Files and folders
        [10] pub has_custom_icon,
        // Files only
        [11] pub is_stationery,
        // Files and folders
        [12] pub name_locked,
        // Files only
        [13] pub has_bundle,
        // Files and folders
        [14] pub is_invisible,
        // Files only
        [15] pub is_alias,
    }
}

impl FinderFlags {
    /// View a raw big-endian-decoded flags word.
    pub fn from_word(word: u16) -> Self {
        Self(word)
    }
}

/// Extended Finder flags (`fdXFlags`). Bits not listed here are reserved.
#[repr(u16)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtendedFinderFlags {
    /// The other extended flags should be ignored
    FlagsAreInvalid = 0x8000,

    /// The file or folder has a badge resource
    HasCustomBadge = 0x0100,

    /// The file contains routing info resource
    HasRoutingInfo = 0x0004,
}

impl ExtendedFinderFlags {
    pub fn is_set(self, word: u16) -> bool {
        word & self as u16 != 0
    }
}

/// Colors assigned to the Finder's seven default Labels.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum LabelColor {
    Gray = 1,
    Green = 2,
    Purple = 3,
    Blue = 4,
    Yellow = 5,
    Red = 6,
    Orange = 7,
}

impl LabelColor {
    /// Raw 3-bit value as stored in the flags word.
    pub fn bits(self) -> u8 {
        self as u8
    }

    pub fn name(self) -> &'static str {
        match self {
            LabelColor::Gray => "Gray",
            LabelColor::Green => "Green",
            LabelColor::Purple => "Purple",
            LabelColor::Blue => "Blue",
            LabelColor::Yellow => "Yellow",
            LabelColor::Red => "Red",
            LabelColor::Orange => "Orange",
        }
    }
}

impl TryFrom<u8> for LabelColor {
    type Error = u8;

    /// Zero means no Label; anything above seven cannot come from three bits.
    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(LabelColor::Gray),
            2 => Ok(LabelColor::Green),
            3 => Ok(LabelColor::Purple),
            4 => Ok(LabelColor::Blue),
            5 => Ok(LabelColor::Yellow),
            6 => Ok(LabelColor::Red),
            7 => Ok(LabelColor::Orange),
            other => Err(other),
        }
    }
}

impl fmt::Display for LabelColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Extract the 3-bit Label value from a Finder flags word, in `0..=7`.
pub fn label_bits(flags: u16) -> u8 {
    FinderFlags::from_word(flags).color()
}

/// Label color of a Finder flags word. A zeroed word, or one whose Label bits
/// are clear, has no color.
pub fn label_color(flags: u16) -> Option<LabelColor> {
    if flags == 0 {
        return None;
    }
    LabelColor::try_from(label_bits(flags)).ok()
}

/// File information used by the Finder (`FInfo`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, DekuRead)]
#[deku(endian = "endian", ctx = "endian: Endian", ctx_default = "Endian::Big")]
#[cfg_attr(feature = "repr_c", repr(C))]
pub struct FinderInfo {
    pub file_type: OsType,
    pub file_creator: OsType,
    pub finder_flags: u16,
    /// Coordinate relative to parent folder
    pub location: Point,
    /// Folder containing the file (`fdFldr`)
    pub folder_id: u16,
}

impl FinderInfo {
    pub const SIZE: usize = 16;

    pub fn flags(&self) -> FinderFlags {
        FinderFlags::from_word(self.finder_flags)
    }

    pub fn label_color(&self) -> Option<LabelColor> {
        label_color(self.finder_flags)
    }
}

/// Additional file information used by the Finder (`FXInfo`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, DekuRead)]
#[deku(endian = "endian", ctx = "endian: Endian", ctx_default = "Endian::Big")]
#[cfg_attr(feature = "repr_c", repr(C))]
pub struct ExtendedFinderInfo {
    /// Icon ID and three reserved words
    pub reserved_1: [i16; 4],
    pub extended_finder_flags: u16,
    /// Comment ID
    pub reserved_2: i16,
    pub put_away_folder_id: i32,
}

impl ExtendedFinderInfo {
    pub const SIZE: usize = 16;

    /// Honors `FlagsAreInvalid`: when it is set, no other flag reads as set.
    pub fn has_flag(&self, flag: ExtendedFinderFlags) -> bool {
        if flag != ExtendedFinderFlags::FlagsAreInvalid
            && ExtendedFinderFlags::FlagsAreInvalid.is_set(self.extended_finder_flags)
        {
            return false;
        }
        flag.is_set(self.extended_finder_flags)
    }
}
