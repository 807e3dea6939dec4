use appledouble::{Document, Entry, EntryBody, LabelColor, sidecar};
use itertools::Itertools;
use sha2::{Digest, Sha256};
use std::env;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

fn main() -> Result<(), io::Error> {
    let args: Vec<String> = env::args().collect();
    let (color_only, path) = match args.as_slice() {
        [_, path] => (false, path),
        [_, flag, path] if flag == "--color" => (true, path),
        _ => {
            eprintln!("usage: read [--color] /path/to/file");
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                "Missing file argument",
            ));
        }
    };

    let sidecar_path = locate_sidecar(Path::new(path))?;
    println!("Operating on {}", sidecar_path.display());

    let bytes = fs::read(&sidecar_path)?;
    let document = appledouble::parse(&bytes)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;

    if color_only {
        if document.finder_info().is_none() {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                format!(
                    "Couldn't read Finder color flags in {}",
                    sidecar_path.display()
                ),
            ));
        }
        let bits = document.label_color().map_or(0, LabelColor::bits);
        println!("Color flags set to: {bits}");
        return Ok(());
    }

    dump(&document);
    Ok(())
}

/// Accept either the sidecar itself or the data file it describes.
fn locate_sidecar(path: &Path) -> Result<PathBuf, io::Error> {
    if sidecar::is_sidecar(path) {
        return Ok(path.to_path_buf());
    }
    sidecar::sidecar_path(path)
        .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "Path has no file name"))
}

fn hex(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{b:02x}")).join(" ")
}

fn dump(document: &Document) {
    println!("Magic: {}", hex(&document.magic()));
    println!("Version: {:#010x}", document.version());
    println!("Reserved: {}", hex(document.reserved()));
    println!("Number of Entries: {}", document.entry_count());
    println!();

    for line in descriptor_lines(document) {
        println!("{line}");
    }
    println!();

    for entry in document.entries() {
        dump_entry(entry);
        println!();
    }

    for warning in document.warnings() {
        eprintln!("warning: {warning}");
    }

    match document.label_color() {
        Some(color) => println!("Label: {color} ({})", color.bits()),
        None => println!("Label: none"),
    }
}

/// One line per descriptor in table order, replaced duplicates included.
fn descriptor_lines(document: &Document) -> Vec<String> {
    document
        .descriptors()
        .iter()
        .enumerate()
        .map(|(index, descriptor)| {
            format!(
                "Descriptor {index}: EID {} Offset {} Length {}",
                descriptor.entry_id, descriptor.offset, descriptor.length
            )
        })
        .collect()
}

fn dump_entry(entry: &Entry) {
    let kind = entry
        .kind()
        .map_or_else(|| "unknown".to_string(), |kind| kind.to_string());
    println!("  EID: {} ({kind})", entry.type_code);
    println!("  Offset {} (Length {})", entry.offset, entry.length);

    match &entry.body {
        EntryBody::FinderInfo { info, extended } => {
            let flags = info.flags();
            println!("  Type: {}", info.file_type);
            println!("  Creator: {}", info.file_creator);
            println!("  Flags: {:016b}", info.finder_flags);
            println!(
                "  Invisible: {}, Alias: {}, Custom Icon: {}",
                flags.is_invisible(),
                flags.is_alias(),
                flags.has_custom_icon()
            );
            println!("  Location: ({}, {})", info.location.v, info.location.h);
            println!("  Folder: {}", info.folder_id);
            if let Some(extended) = extended {
                println!("  Extended Flags: {:016b}", extended.extended_finder_flags);
                println!("  Put Away Folder: {}", extended.put_away_folder_id);
            }
        }
        EntryBody::FileInfo(info) => {
            println!("  Created: {:#010x}", info.create_date);
            println!("  Modified: {:#010x}", info.modification_date);
            println!("  Backed Up: {:#010x}", info.backup_date);
            println!("  Flags: {:032b}", info.flags);
        }
        EntryBody::Opaque | EntryBody::Unknown => {
            println!("  SHA-256: {:x}", Sha256::digest(&entry.data));
        }
        EntryBody::Failed(error) => {
            println!("  Failed: {error}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_descriptor_is_listed() {
        let mut buf = appledouble::MAGIC.to_vec();
        buf.extend_from_slice(&0x0002_0000u32.to_be_bytes());
        buf.extend_from_slice(&[0u8; 16]);
        buf.extend_from_slice(&3u16.to_be_bytes());
        for (id, offset, length) in [(9u32, 62u32, 0u32), (2, 62, 0), (9, 62, 0)] {
            buf.extend_from_slice(&id.to_be_bytes());
            buf.extend_from_slice(&offset.to_be_bytes());
            buf.extend_from_slice(&length.to_be_bytes());
        }
        let document = appledouble::parse(&buf).unwrap();

        assert_eq!(
            descriptor_lines(&document),
            vec![
                "Descriptor 0: EID 9 Offset 62 Length 0",
                "Descriptor 1: EID 2 Offset 62 Length 0",
                "Descriptor 2: EID 9 Offset 62 Length 0",
            ]
        );
        assert_eq!(document.entries().count(), 2);
    }
}
