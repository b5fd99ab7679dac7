/*
Copyright 2024 San Francisco Compute Company

Licensed under the Apache License, Version 2.0 (the "License");
you may not use this file except in compliance with the License.
You may obtain a copy of the License at

    http://www.apache.org/licenses/LICENSE-2.0

Unless required by applicable law or agreed to in writing, software
distributed under the License is distributed on an "AS IS" BASIS,
WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
See the License for the specific language governing permissions and
limitations under the License.
*/

//! dxdiag XML report parsing
//!
//! Expected command: `dxdiag /x <file>`

use crate::domain::DiagnosticsSection;
use log::debug;
use quick_xml::events::Event;
use quick_xml::Reader;

pub const SYSTEM_INFORMATION: &str = "SystemInformation";
pub const DISPLAY_DEVICES: &str = "DisplayDevices";
pub const LOGICAL_DISKS: &str = "LogicalDisks";

const ROOT: &str = "DxDiag";
const SYSTEM_INFORMATION_KEYS: &[&str] = &["Processor", "Memory"];
const DISPLAY_DEVICE_KEYS: &[&str] = &["CardName", "CurrentMode"];

#[derive(Debug)]
struct LogicalDisk {
    drive: String,
    free_space: String,
    size: String,
}

impl Default for LogicalDisk {
    fn default() -> Self {
        Self {
            drive: "N/A".to_string(),
            free_space: "N/A".to_string(),
            size: "N/A".to_string(),
        }
    }
}

impl LogicalDisk {
    fn into_row(self) -> Vec<String> {
        vec![
            format!("Drive: {}", self.drive),
            format!("Free Space: {}", self.free_space),
            format!("Size: {}", self.size),
        ]
    }
}

/// Decode raw report bytes, honouring a UTF-8 or UTF-16 byte order mark
///
/// dxdiag writes UTF-16 on some Windows builds.
pub fn decode_report_bytes(bytes: &[u8]) -> String {
    match bytes {
        [0xEF, 0xBB, 0xBF, rest @ ..] => String::from_utf8_lossy(rest).into_owned(),
        [0xFF, 0xFE, rest @ ..] => decode_utf16(rest, u16::from_le_bytes),
        [0xFE, 0xFF, rest @ ..] => decode_utf16(rest, u16::from_be_bytes),
        _ => String::from_utf8_lossy(bytes).into_owned(),
    }
}

fn decode_utf16(bytes: &[u8], to_unit: fn([u8; 2]) -> u16) -> String {
    let units: Vec<u16> = bytes
        .chunks_exact(2)
        .map(|pair| to_unit([pair[0], pair[1]]))
        .collect();
    String::from_utf16_lossy(&units)
}

/// Parse a dxdiag XML report into sections
///
/// Keeps `SystemInformation` (Processor, Memory), `DisplayDevices` (CardName,
/// CurrentMode of every device) and `LogicalDisks` (one drive / free space /
/// size row per disk). Other sections are skipped. Empty values are dropped.
///
/// # Arguments
/// * `xml` - Report contents
///
/// # Returns
/// * `Ok(Vec<DiagnosticsSection>)` - Sections in document order
/// * `Err(String)` - Missing `DxDiag` root or malformed XML
pub fn parse_dxdiag_xml(xml: &str) -> Result<Vec<DiagnosticsSection>, String> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut path: Vec<String> = Vec::new();
    let mut sections = Vec::new();
    let mut section: Option<DiagnosticsSection> = None;
    let mut disk: Option<LogicalDisk> = None;
    let mut text = String::new();
    let mut root_closed = false;

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => {
                let name = String::from_utf8_lossy(e.name().as_ref()).into_owned();
                match path.len() {
                    0 if name != ROOT => {
                        return Err("Could not find DxDiag root element".to_string());
                    }
                    1 if matches!(
                        name.as_str(),
                        SYSTEM_INFORMATION | DISPLAY_DEVICES | LOGICAL_DISKS
                    ) =>
                    {
                        debug!("Started parsing {name} section");
                        section = Some(DiagnosticsSection::new(&name));
                    }
                    2 if name == "LogicalDisk" && path[1] == LOGICAL_DISKS => {
                        disk = Some(LogicalDisk::default());
                    }
                    _ => {}
                }
                path.push(name);
                text.clear();
            }
            Ok(Event::Empty(e)) => {
                if path.is_empty() {
                    if e.name().as_ref() != ROOT.as_bytes() {
                        return Err("Could not find DxDiag root element".to_string());
                    }
                    root_closed = true;
                    break;
                }
            }
            Ok(Event::Text(t)) => {
                let value = t
                    .unescape()
                    .map_err(|e| format!("XML parsing error: {e}"))?;
                text.push_str(&value);
            }
            Ok(Event::CData(c)) => {
                text.push_str(&String::from_utf8_lossy(&c.into_inner()));
            }
            Ok(Event::End(_)) => {
                let Some(name) = path.pop() else {
                    return Err("XML parsing error: unexpected closing tag".to_string());
                };
                let value = text.trim().to_string();
                text.clear();

                let parents: Vec<&str> = path.iter().map(String::as_str).collect();
                match parents.as_slice() {
                    [] => {
                        root_closed = true;
                        break;
                    }
                    [_] => {
                        if let Some(done) = section.take() {
                            debug!(
                                "Finished parsing {} section with {} rows",
                                done.name,
                                done.rows.len()
                            );
                            sections.push(done);
                        }
                    }
                    [_, SYSTEM_INFORMATION] => {
                        if SYSTEM_INFORMATION_KEYS.contains(&name.as_str()) && !value.is_empty() {
                            push_row(&mut section, vec![name, value]);
                        }
                    }
                    [_, LOGICAL_DISKS] if name == "LogicalDisk" => {
                        if let Some(done) = disk.take() {
                            push_row(&mut section, done.into_row());
                        }
                    }
                    [_, DISPLAY_DEVICES, "DisplayDevice"] => {
                        if DISPLAY_DEVICE_KEYS.contains(&name.as_str()) && !value.is_empty() {
                            push_row(&mut section, vec![name, value]);
                        }
                    }
                    [_, LOGICAL_DISKS, "LogicalDisk"] => {
                        if let Some(current) = disk.as_mut() {
                            match name.as_str() {
                                "DriveLetter" => current.drive = value,
                                "FreeSpace" => current.free_space = value,
                                "MaxSpace" => current.size = value,
                                _ => {}
                            }
                        }
                    }
                    _ => {}
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(format!(
                    "XML parsing error at position {}: {e}",
                    reader.buffer_position()
                ))
            }
            _ => {}
        }
    }

    if !root_closed {
        return Err(if path.is_empty() {
            "Could not find DxDiag root element".to_string()
        } else {
            "XML parsing error: unexpected end of document".to_string()
        });
    }

    Ok(sections)
}

fn push_row(section: &mut Option<DiagnosticsSection>, row: Vec<String>) {
    if let Some(section) = section.as_mut() {
        section.rows.push(row);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<DxDiag>
  <SystemInformation>
    <Time>16/10/2026, 09:20:11</Time>
    <Processor>Intel(R) Core(TM) i7-9700K CPU @ 3.60GHz (8 CPUs), ~3.6GHz</Processor>
    <Memory>16384MB RAM</Memory>
    <PageFile></PageFile>
  </SystemInformation>
  <DisplayDevices>
    <DisplayDevice>
      <CardName>NVIDIA GeForce RTX 2070 SUPER</CardName>
      <Manufacturer>NVIDIA</Manufacturer>
      <CurrentMode>2560 x 1440 (32 bit) (144Hz)</CurrentMode>
    </DisplayDevice>
  </DisplayDevices>
  <SoundDevices>
    <SoundDevice><Description>Speakers</Description></SoundDevice>
  </SoundDevices>
  <LogicalDisks>
    <LogicalDisk>
      <DriveLetter>C:</DriveLetter>
      <FreeSpace>442381185024</FreeSpace>
      <MaxSpace>999559262208</MaxSpace>
      <FileSystem>NTFS</FileSystem>
    </LogicalDisk>
    <LogicalDisk>
      <DriveLetter>D:</DriveLetter>
    </LogicalDisk>
  </LogicalDisks>
</DxDiag>"#;

    #[test]
    fn test_parse_dxdiag_sections() {
        let sections = parse_dxdiag_xml(SAMPLE).unwrap();
        let names: Vec<&str> = sections.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec![SYSTEM_INFORMATION, DISPLAY_DEVICES, LOGICAL_DISKS]);

        assert_eq!(
            sections[0].rows,
            vec![
                vec![
                    "Processor".to_string(),
                    "Intel(R) Core(TM) i7-9700K CPU @ 3.60GHz (8 CPUs), ~3.6GHz".to_string()
                ],
                vec!["Memory".to_string(), "16384MB RAM".to_string()],
            ]
        );
        assert_eq!(sections[1].rows.len(), 2);
        assert_eq!(
            sections[1].values("CardName").collect::<Vec<_>>(),
            vec!["NVIDIA GeForce RTX 2070 SUPER"]
        );
    }

    #[test]
    fn test_parse_logical_disks() {
        let sections = parse_dxdiag_xml(SAMPLE).unwrap();
        let disks = &sections[2];
        assert_eq!(disks.rows.len(), 2);
        assert_eq!(
            disks.rows[0],
            vec![
                "Drive: C:".to_string(),
                "Free Space: 442381185024".to_string(),
                "Size: 999559262208".to_string(),
            ]
        );
        assert_eq!(disks.rows[1][1], "Free Space: N/A");
    }

    #[test]
    fn test_parse_escaped_text() {
        let xml = "<DxDiag><DisplayDevices><DisplayDevice><CardName>AMD Radeon &amp; Co</CardName></DisplayDevice></DisplayDevices></DxDiag>";
        let sections = parse_dxdiag_xml(xml).unwrap();
        assert_eq!(sections[0].rows[0][1], "AMD Radeon & Co");
    }

    #[test]
    fn test_missing_root() {
        let err = parse_dxdiag_xml("<Report><SystemInformation/></Report>").unwrap_err();
        assert!(err.contains("DxDiag root"));
        assert!(parse_dxdiag_xml("").unwrap_err().contains("DxDiag root"));
    }

    #[test]
    fn test_malformed_xml() {
        let err = parse_dxdiag_xml("<DxDiag><SystemInformation></DxDiag>").unwrap_err();
        assert!(err.contains("XML parsing error"));
        let err = parse_dxdiag_xml("<DxDiag><SystemInformation>").unwrap_err();
        assert!(err.contains("XML parsing error"));
    }

    #[test]
    fn test_decode_report_bytes() {
        assert_eq!(decode_report_bytes(b"\xEF\xBB\xBF<DxDiag/>"), "<DxDiag/>");

        let mut utf16 = vec![0xFF, 0xFE];
        for unit in "<DxDiag/>".encode_utf16() {
            utf16.extend_from_slice(&unit.to_le_bytes());
        }
        assert_eq!(decode_report_bytes(&utf16), "<DxDiag/>");
        assert_eq!(decode_report_bytes(b"plain"), "plain");
    }
}
