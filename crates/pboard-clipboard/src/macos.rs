//! `NSPasteboard` backend for macOS.
//!
//! The general pasteboard is looked up afresh inside every call and nothing
//! is retained between calls, so the backend itself is a zero-sized token.

#![allow(unsafe_code)]

use objc2::rc::{autoreleasepool, Retained};
use objc2_app_kit::{NSPasteboard, NSPasteboardItem};
use objc2_foundation::{NSArray, NSString, NSURL};
use tracing::{debug, warn};

use crate::backend::PasteboardBackend;
use crate::error::ClipboardError;
use crate::format::{UTI_FILE_URL, UTI_UTF8_TEXT};

/// The macOS general pasteboard.
#[derive(Debug, Clone, Copy)]
pub struct MacPasteboard {
    _private: (),
}

impl MacPasteboard {
    /// Check that the general pasteboard is reachable.
    pub fn open() -> Result<Self, ClipboardError> {
        autoreleasepool(|_| {
            let pasteboard = general();
            let count = unsafe { pasteboard.changeCount() };
            debug!(change_count = count, "general pasteboard reachable");
        });
        Ok(Self { _private: () })
    }
}

fn general() -> Retained<NSPasteboard> {
    unsafe { NSPasteboard::generalPasteboard() }
}

fn items(pasteboard: &NSPasteboard) -> Option<Retained<NSArray<NSPasteboardItem>>> {
    unsafe { pasteboard.pasteboardItems() }
}

fn item_at(pasteboard: &NSPasteboard, index: usize) -> Option<Retained<NSPasteboardItem>> {
    items(pasteboard).and_then(|items| items.get(index))
}

fn file_path(item: &NSPasteboardItem) -> Option<String> {
    let file_url_type = NSString::from_str(UTI_FILE_URL);
    let url_string = unsafe { item.stringForType(&file_url_type) }?;
    let url = unsafe { NSURL::URLWithString(&url_string) }?;
    let path = unsafe { url.path() }?;
    Some(path.to_string())
}

impl PasteboardBackend for MacPasteboard {
    fn change_count(&self) -> Result<i64, ClipboardError> {
        let count = autoreleasepool(|_| unsafe { general().changeCount() });
        i64::try_from(count).map_err(|e| ClipboardError::Other(e.into()))
    }

    fn item_count(&self) -> Result<usize, ClipboardError> {
        Ok(autoreleasepool(|_| {
            items(&general()).map_or(0, |items| items.count())
        }))
    }

    fn item_types(&self, index: usize) -> Result<Vec<String>, ClipboardError> {
        Ok(autoreleasepool(|_| {
            let Some(item) = item_at(&general(), index) else {
                return Vec::new();
            };
            let types = unsafe { item.types() };
            types.iter().map(|t| t.to_string()).collect()
        }))
    }

    fn item_data(
        &self,
        index: usize,
        declared_type: &str,
    ) -> Result<Option<Vec<u8>>, ClipboardError> {
        Ok(autoreleasepool(|_| {
            let item = item_at(&general(), index)?;
            let ty = NSString::from_str(declared_type);
            if declared_type == UTI_UTF8_TEXT {
                let text = unsafe { item.stringForType(&ty) }?;
                return Some(text.to_string().into_bytes());
            }
            let data = unsafe { item.dataForType(&ty) }?;
            Some(data.to_vec())
        }))
    }

    fn file_paths(&self) -> Result<Vec<String>, ClipboardError> {
        Ok(autoreleasepool(|_| {
            let Some(items) = items(&general()) else {
                return Vec::new();
            };
            (0..items.count())
                .filter_map(|i| items.get(i))
                .filter_map(|item| file_path(&item))
                .collect()
        }))
    }

    fn write_text(&self, text: &str) -> Result<(), ClipboardError> {
        let written = autoreleasepool(|_| {
            let pasteboard = general();
            let value = NSString::from_str(text);
            let ty = NSString::from_str(UTI_UTF8_TEXT);
            unsafe {
                pasteboard.clearContents();
                pasteboard.setString_forType(&value, &ty)
            }
        });
        if written {
            Ok(())
        } else {
            warn!("general pasteboard refused text");
            Err(ClipboardError::WriteRejected(
                "NSPasteboard setString:forType: returned NO".to_string(),
            ))
        }
    }
}
