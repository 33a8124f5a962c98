// ── PDB symbol-dump parser ────────────────────────────────────────────────────
//
// Reads the text produced by cvdump-style tools: a `*** SYMBOLS` section
// containing one `** Module: "<name>"` block per object file, each a run of
// `(nnnnnn) S_<KIND>: …` records.  We only care about the records that carry
// a code size or a data type:
//
//   (000140) S_GPROC32: [0001:00010AF0], Cb: 00000023, Type: 0x1012, Foo::bar
//   (0001A8) S_THUNK32: [0001:00010B20], Cb: 0000000A, Foo::baz
//   (000224) S_GDATA32: [0003:00000104], Type: 0x1138, g_table
//
// Malformed records are skipped, matching the tool's overall
// silent-degradation policy; the only hard error is a dump with no
// `*** SYMBOLS` section at all.

use crate::error::{BloatviewError, Result};

// ── Parse output ──────────────────────────────────────────────────────────────

/// One `S_*PROC32` or `S_THUNK32` record.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct Function {
    pub(crate) name: String,
    /// Code size in bytes, from the hexadecimal `Cb:` field.
    pub(crate) num_bytes: u64,
}

/// One `S_*DATA32` or `S_*THREAD32` record.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct DataObject {
    pub(crate) name: String,
    /// Type index from the `Type:` field, or -1 for `T_` primitive types.
    pub(crate) type_id: i64,
}

/// One object file's worth of symbols.
#[derive(Clone, Debug, Default)]
pub(crate) struct Module {
    pub(crate) name: String,
    pub(crate) functions: Vec<Function>,
    pub(crate) data_objects: Vec<DataObject>,
}

impl Module {
    fn named(name: &str) -> Self {
        Module {
            name: name.to_owned(),
            ..Default::default()
        }
    }

    /// Total code bytes contributed by this module.
    pub(crate) fn code_bytes(&self) -> u64 {
        self.functions.iter().map(|f| f.num_bytes).sum()
    }
}

/// Everything extracted from one dump file.
#[derive(Clone, Debug, Default)]
pub(crate) struct DumpSummary {
    pub(crate) modules: Vec<Module>,
    pub(crate) total_code_bytes: u64,
    pub(crate) total_functions: usize,
}

// ── Parser ────────────────────────────────────────────────────────────────────

/// Parse a whole dump file.
///
/// Errors only when the `*** SYMBOLS` section is missing; every other
/// irregularity degrades to skipped records.
pub(crate) fn parse_dump(text: &str) -> Result<DumpSummary> {
    let mut summary = DumpSummary::default();
    let mut in_symbols = false;

    for raw in text.lines() {
        let line = raw.strip_suffix('\r').unwrap_or(raw);

        if !in_symbols {
            in_symbols = line.starts_with("*** SYMBOLS");
            continue;
        }
        if line.starts_with("*** GLOBALS") {
            break;
        }

        if let Some(rest) = line.strip_prefix("** Module: ") {
            if let Some(name) = quoted(rest) {
                summary.modules.push(Module::named(name));
            }
            continue;
        }

        // Records before the first module header have nowhere to go.
        let Some(module) = summary.modules.last_mut() else {
            continue;
        };
        let Some(payload) = symbol_payload(line) else {
            continue;
        };
        // The first character after `S_` is the scope (G/L) or the leading
        // letter of THUNK/THREAD; the kind is recognisable without it.
        let Some(kind) = payload.get(1..) else {
            continue;
        };

        if let Some(rest) = kind.strip_prefix("PROC32: ") {
            if let Some(f) = parse_function(rest, false) {
                summary.total_code_bytes += f.num_bytes;
                summary.total_functions += 1;
                module.functions.push(f);
            }
        } else if let Some(rest) = kind.strip_prefix("HUNK32: ") {
            if let Some(f) = parse_function(rest, true) {
                summary.total_code_bytes += f.num_bytes;
                summary.total_functions += 1;
                module.functions.push(f);
            }
        } else if let Some(rest) = kind
            .strip_prefix("DATA32: ")
            .or_else(|| kind.strip_prefix("THREAD32: "))
        {
            if let Some(d) = parse_data_object(rest) {
                module.data_objects.push(d);
            }
        }
    }

    if !in_symbols {
        return Err(BloatviewError::Parse(
            "no *** SYMBOLS section in input file".to_owned(),
        ));
    }
    Ok(summary)
}

/// The text after `) S_` in a `(nnnnnn) S_…` record line.
fn symbol_payload(line: &str) -> Option<&str> {
    let rest = line.strip_prefix('(')?;
    // Six-digit record offset, then the close paren.
    rest.get(6..)?.strip_prefix(") S_")
}

/// The contents of the first double-quoted span in `s`.
fn quoted(s: &str) -> Option<&str> {
    let rest = s.strip_prefix('"')?;
    let end = rest.find('"')?;
    Some(&rest[..end])
}

/// The text after the first occurrence of `needle`.
fn after<'a>(s: &'a str, needle: &str) -> Option<&'a str> {
    s.find(needle).map(|i| &s[i + needle.len()..])
}

/// Parse the leading run of hex digits.
fn leading_hex(s: &str) -> Option<u64> {
    let end = s
        .find(|c: char| !c.is_ascii_hexdigit())
        .unwrap_or(s.len());
    u64::from_str_radix(&s[..end], 16).ok()
}

/// Parse the tail of a `PROC32:`/`HUNK32:` record.  Thunk records carry no
/// `Type:` field; the name is whatever follows the field separator after the
/// last recognised field.
fn parse_function(rest: &str, is_thunk: bool) -> Option<Function> {
    let after_cb = after(rest, "Cb: ")?;
    let num_bytes = leading_hex(after_cb)?;

    let tail = if is_thunk {
        after_cb
    } else {
        after(after_cb, "Type: ")?
    };
    let name = after(tail, ", ")?;
    if name.is_empty() {
        return None;
    }

    Some(Function {
        name: name.to_owned(),
        num_bytes,
    })
}

/// Parse the tail of a `DATA32:`/`THREAD32:` record.
fn parse_data_object(rest: &str) -> Option<DataObject> {
    let type_field = after(rest, "Type:")?.trim_start_matches(' ');

    let type_id = if let Some(hex) = type_field.strip_prefix("0x") {
        leading_hex(hex)? as i64
    } else if type_field.starts_with("T_") {
        // Primitive type names carry no numeric index.
        -1
    } else {
        return None;
    };

    let name = after(type_field, ", ")?;
    if name.is_empty() {
        return None;
    }

    Some(DataObject {
        name: name.to_owned(),
        type_id,
    })
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    const DUMP: &str = "\
Microsoft (R) Debugging Information Dumper

*** SYMBOLS

** Module: \"app.obj\"

(000140) S_GPROC32: [0001:00010AF0], Cb: 00000023, Type: 0x1012, Frame::draw
(000190) S_LPROC32: [0001:00010B20], Cb: 0000000A, Type: 0x1013, local_helper
(0001D0) S_THUNK32: [0001:00010B40], Cb: 00000005, Frame::draw_adjustor
(000224) S_GDATA32: [0003:00000104], Type: 0x1138, g_table
(000258) S_LDATA32: [0003:00000140], Type: T_32PRCHAR(0470), s_banner
(000290) S_GTHREAD32: [0004:00000000], Type: 0x1139, t_slot

** Module: \"Import:KERNEL32.dll\"

(000300) S_GPROC32: [0001:00020000], Cb: 000000FF, Type: 0x1200, CreateFileW

*** GLOBALS

(000400) S_GPROC32: [0001:00030000], Cb: 00000001, Type: 0x1300, after_globals
";

    #[test]
    fn parses_modules_and_record_counts() {
        let summary = parse_dump(DUMP).expect("parse");
        assert_eq!(summary.modules.len(), 2);

        let app = &summary.modules[0];
        assert_eq!(app.name, "app.obj");
        assert_eq!(app.functions.len(), 3);
        assert_eq!(app.data_objects.len(), 3);

        assert_eq!(summary.modules[1].name, "Import:KERNEL32.dll");
        assert_eq!(summary.modules[1].functions.len(), 1);
    }

    #[test]
    fn function_sizes_parse_from_hex() {
        let summary = parse_dump(DUMP).expect("parse");
        let app = &summary.modules[0];
        assert_eq!(
            app.functions[0],
            Function {
                name: "Frame::draw".to_owned(),
                num_bytes: 0x23
            }
        );
        assert_eq!(app.code_bytes(), 0x23 + 0x0A + 0x05);
    }

    #[test]
    fn thunks_have_no_type_field() {
        let summary = parse_dump(DUMP).expect("parse");
        let thunk = &summary.modules[0].functions[2];
        assert_eq!(thunk.name, "Frame::draw_adjustor");
        assert_eq!(thunk.num_bytes, 5);
    }

    #[test]
    fn data_objects_carry_type_ids() {
        let summary = parse_dump(DUMP).expect("parse");
        let data = &summary.modules[0].data_objects;
        assert_eq!(data[0].type_id, 0x1138);
        assert_eq!(data[0].name, "g_table");
        // Primitive T_ types map to -1.
        assert_eq!(data[1].type_id, -1);
        assert_eq!(data[1].name, "s_banner");
        // Thread-local storage records are data objects too.
        assert_eq!(data[2].name, "t_slot");
    }

    #[test]
    fn totals_cover_all_modules_but_stop_at_globals() {
        let summary = parse_dump(DUMP).expect("parse");
        assert_eq!(summary.total_functions, 4);
        assert_eq!(summary.total_code_bytes, 0x23 + 0x0A + 0x05 + 0xFF);
    }

    #[test]
    fn missing_symbols_section_is_an_error() {
        let err = parse_dump("just some text\n").unwrap_err();
        assert!(matches!(err, BloatviewError::Parse(_)));
    }

    #[test]
    fn records_before_any_module_are_skipped() {
        let text = "\
*** SYMBOLS

(000140) S_GPROC32: [0001:00010AF0], Cb: 00000023, Type: 0x1012, stray
";
        let summary = parse_dump(text).expect("parse");
        assert!(summary.modules.is_empty());
        assert_eq!(summary.total_functions, 0);
    }

    #[test]
    fn malformed_records_are_skipped() {
        let text = "\
*** SYMBOLS

** Module: \"m.obj\"

(000140) S_GPROC32: [0001:00010AF0], Cb: , Type: 0x1012, broken
(000150) S_GPROC32: garbage with no fields
(000160) S_UDT: Foo
not a record at all
(000170) S_GPROC32: [0001:00010B00], Cb: 00000010, Type: 0x1012, ok
";
        let summary = parse_dump(text).expect("parse");
        assert_eq!(summary.modules[0].functions.len(), 1);
        assert_eq!(summary.modules[0].functions[0].name, "ok");
    }

    #[test]
    fn crlf_input_parses_the_same() {
        let crlf = DUMP.replace('\n', "\r\n");
        let summary = parse_dump(&crlf).expect("parse");
        assert_eq!(summary.modules.len(), 2);
        assert_eq!(summary.modules[0].functions[0].name, "Frame::draw");
    }

    #[test]
    fn unquoted_module_header_is_skipped() {
        let text = "\
*** SYMBOLS

** Module: bare-name
";
        let summary = parse_dump(text).expect("parse");
        assert!(summary.modules.is_empty());
    }
}
