//! Streams the `program` document with `quick-xml` into a loosely-typed
//! intermediate tree. No opcode/arg-kind validation happens here — that is
//! [`crate::decode`]'s job, once the raw shape is known to be sound.

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use crate::error::{Error, Result};

pub struct RawArg {
    pub index: u8,
    pub kind: String,
    pub body: String,
}

pub struct RawInstruction {
    pub order: i64,
    pub opcode: String,
    pub args: Vec<RawArg>,
}

/// Parses the whole document and returns its `instruction` children in
/// source order, without sorting or order/opcode validation.
pub fn parse(xml: &str) -> Result<Vec<RawInstruction>> {
    let mut reader = Reader::from_str(xml);
    reader.trim_text(true);

    let mut buf = Vec::new();
    let mut instructions = Vec::new();
    let mut saw_root = false;

    loop {
        match reader.read_event(&mut buf)? {
            Event::Start(start) if !saw_root => {
                expect_program_root(&reader, &start)?;
                saw_root = true;
            }
            Event::Start(start) if saw_root && local_name(&start) == b"instruction" => {
                instructions.push(parse_instruction(&mut reader, &start, true)?);
            }
            Event::Empty(start) if saw_root && local_name(&start) == b"instruction" => {
                instructions.push(parse_instruction(&mut reader, &start, false)?);
            }
            Event::Start(start) | Event::Empty(start) if saw_root => {
                return Err(Error::Structural(format!(
                    "expected an \"instruction\" element, found \"{}\"",
                    String::from_utf8_lossy(local_name(&start))
                )));
            }
            Event::Start(_) | Event::Empty(_) => {
                return Err(Error::Structural("content appears before the \"program\" root element".to_owned()));
            }
            Event::End(_) | Event::Comment(_) | Event::Decl(_) | Event::PI(_) | Event::DocType(_)
            | Event::Text(_) | Event::CData(_) => {}
            Event::Eof => break,
        }
        buf.clear();
    }

    if !saw_root {
        return Err(Error::Structural("document has no \"program\" root element".to_owned()));
    }

    Ok(instructions)
}

fn local_name(start: &BytesStart) -> &[u8] {
    let name = start.name();
    match name.iter().rposition(|&b| b == b':') {
        Some(pos) => &name[pos + 1..],
        None => name,
    }
}

fn expect_program_root(reader: &Reader<&[u8]>, start: &BytesStart) -> Result<()> {
    if local_name(start) != b"program" {
        return Err(Error::Structural(format!(
            "root element must be \"program\", found \"{}\"",
            String::from_utf8_lossy(local_name(start))
        )));
    }
    let language = attr(reader, start, b"language")?
        .ok_or_else(|| Error::Structural("\"program\" is missing its \"language\" attribute".to_owned()))?;
    if !language.eq_ignore_ascii_case("ippcode23") {
        return Err(Error::Structural(format!("unsupported language \"{}\"", language)));
    }
    Ok(())
}

/// `has_children` distinguishes `<instruction>...</instruction>` (whose
/// matching `End` this function must consume) from a self-closing
/// `<instruction/>` (which never has argument children to scan).
fn parse_instruction(reader: &mut Reader<&[u8]>, start: &BytesStart, has_children: bool) -> Result<RawInstruction> {
    let order_text = attr(reader, start, b"order")?
        .ok_or_else(|| Error::Structural("\"instruction\" is missing its \"order\" attribute".to_owned()))?;
    let order = order_text
        .parse::<i64>()
        .map_err(|_| Error::Structural(format!("\"order\" value \"{}\" is not an integer", order_text)))?;
    let opcode = attr(reader, start, b"opcode")?
        .ok_or_else(|| Error::Structural("\"instruction\" is missing its \"opcode\" attribute".to_owned()))?;

    let args = if has_children { parse_args(reader)? } else { Vec::new() };

    Ok(RawInstruction { order, opcode, args })
}

/// Reads `arg1`/`arg2`/`arg3` children up to the `instruction`'s matching
/// end tag.
fn parse_args(reader: &mut Reader<&[u8]>) -> Result<Vec<RawArg>> {
    let mut args = Vec::new();
    let mut buf = Vec::new();
    let mut next_index = 1u8;

    loop {
        match reader.read_event(&mut buf)? {
            Event::Start(arg_start) => {
                let index = expected_arg_index(local_name(&arg_start), next_index)?;
                let kind = arg_type(reader, &arg_start)?;
                let body = read_arg_body(reader)?;
                args.push(RawArg { index, kind, body });
                next_index += 1;
            }
            Event::Empty(arg_start) => {
                let index = expected_arg_index(local_name(&arg_start), next_index)?;
                let kind = arg_type(reader, &arg_start)?;
                args.push(RawArg { index, kind, body: String::new() });
                next_index += 1;
            }
            Event::End(_) => break,
            Event::Eof => return Err(Error::Malformed("unexpected end of document inside \"instruction\"".to_owned())),
            _ => {}
        }
        buf.clear();
    }

    Ok(args)
}

fn arg_type(reader: &Reader<&[u8]>, arg_start: &BytesStart) -> Result<String> {
    attr(reader, arg_start, b"type")?.ok_or_else(|| {
        Error::Structural(format!(
            "\"{}\" is missing its \"type\" attribute",
            String::from_utf8_lossy(local_name(arg_start))
        ))
    })
}

fn expected_arg_index(name: &[u8], next_index: u8) -> Result<u8> {
    let index = match name {
        b"arg1" => 1,
        b"arg2" => 2,
        b"arg3" => 3,
        other => {
            return Err(Error::Structural(format!(
                "expected an \"arg1\"/\"arg2\"/\"arg3\" element, found \"{}\"",
                String::from_utf8_lossy(other)
            )))
        }
    };
    if index != next_index {
        return Err(Error::Structural(format!(
            "arguments must appear in order with no gaps (expected arg{}, found arg{})",
            next_index, index
        )));
    }
    Ok(index)
}

/// Reads the text content of an already-opened `arg*` element up to its
/// matching end tag. Nested markup inside an argument body is not part of
/// the document shape, so anything but text/CDATA is ignored.
fn read_arg_body(reader: &mut Reader<&[u8]>) -> Result<String> {
    let mut buf = Vec::new();
    let mut body = String::new();
    loop {
        match reader.read_event(&mut buf)? {
            Event::Text(text) | Event::CData(text) => {
                body.push_str(&text.unescape_and_decode(reader).map_err(Error::from)?);
            }
            Event::End(_) => break,
            Event::Eof => return Err(Error::Malformed("unexpected end of document inside an argument element".to_owned())),
            _ => {}
        }
        buf.clear();
    }
    Ok(body)
}

fn attr(reader: &Reader<&[u8]>, start: &BytesStart, name: &[u8]) -> Result<Option<String>> {
    for attribute in start.attributes() {
        let attribute = attribute.map_err(|e| Error::Malformed(e.to_string()))?;
        if attribute.key == name {
            let value = attribute.unescape_and_decode_value(reader).map_err(Error::from)?;
            return Ok(Some(value));
        }
    }
    Ok(None)
}
