//! Integration tests driving bind collections through a fake execution
//! primitive that reads and writes via descriptor pointers, the way the
//! native client does.

use std::ptr;

use mysql_binds_rs::{
    BindDescriptor, Column, ColumnFactory, Error, OutputColumn, Result, SchemaField, SchemaSource,
    SqlTime, Statement, TableSchema, TypeTag, WireType, BINARY_FLAG, UNSIGNED_FLAG,
};
use tracing_subscriber::EnvFilter;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

#[derive(Debug, Clone)]
enum Cell {
    Null,
    Int(i64),
    Text(&'static str),
    Time(SqlTime),
}

/// Writes one fixed row into whatever descriptors it is handed.
struct FetchOneRow {
    row: Vec<Cell>,
    calls: usize,
}

impl FetchOneRow {
    fn new(row: Vec<Cell>) -> Self {
        Self { row, calls: 0 }
    }
}

impl Statement for FetchOneRow {
    fn execute(&mut self, descriptors: &mut [BindDescriptor]) -> Result<()> {
        self.calls += 1;
        if descriptors.len() != self.row.len() {
            return Err(Error::statement(format!(
                "expected {} result columns, got {}",
                self.row.len(),
                descriptors.len()
            )));
        }
        for (slot, cell) in descriptors.iter().zip(&self.row) {
            // SAFETY: the collection keeps every attached buffer alive for the
            // duration of the call and the slots were built for this array.
            unsafe { write_cell(slot, cell) };
        }
        Ok(())
    }
}

unsafe fn write_cell(slot: &BindDescriptor, cell: &Cell) {
    *slot.is_null = matches!(cell, Cell::Null);
    match cell {
        Cell::Null => {}
        Cell::Int(n) => match slot.buffer_type {
            WireType::Tiny => *slot.buffer.cast::<i8>() = *n as i8,
            WireType::Short => *slot.buffer.cast::<i16>() = *n as i16,
            WireType::Long => *slot.buffer.cast::<i32>() = *n as i32,
            WireType::LongLong => *slot.buffer.cast::<i64>() = *n,
            other => panic!("integer cell for {other}"),
        },
        Cell::Text(text) => {
            let capacity = slot.buffer_length as usize;
            let n = text.len().min(capacity);
            ptr::copy_nonoverlapping(text.as_ptr(), slot.buffer.cast::<u8>(), n);
            *slot.length = text.len() as u64;
            *slot.error = text.len() > capacity;
        }
        Cell::Time(t) => *slot.buffer.cast::<SqlTime>() = *t,
    }
}

/// Captures parameter values as the native client would send them.
#[derive(Default)]
struct CaptureParams {
    sent: Vec<String>,
}

impl Statement for CaptureParams {
    fn execute(&mut self, descriptors: &mut [BindDescriptor]) -> Result<()> {
        for slot in descriptors.iter() {
            // SAFETY: see `FetchOneRow::execute`.
            let text = unsafe {
                if *slot.is_null {
                    "NULL".to_string()
                } else {
                    match slot.buffer_type {
                        WireType::Long => (*slot.buffer.cast::<i32>()).to_string(),
                        WireType::Tiny => (*slot.buffer.cast::<i8>()).to_string(),
                        WireType::String | WireType::Blob => {
                            let len = *slot.length as usize;
                            let bytes = std::slice::from_raw_parts(slot.buffer.cast::<u8>(), len);
                            String::from_utf8_lossy(bytes).into_owned()
                        }
                        other => format!("<{other}>"),
                    }
                }
            };
            self.sent.push(text);
        }
        Ok(())
    }
}

#[test]
fn test_parameters_reach_the_primitive() {
    init_tracing();
    let mut params = ColumnFactory::new()
        .declare(TypeTag::Int, "id", 0)
        .declare(TypeTag::VarChar, "name", 64)
        .declare(TypeTag::Boolean, "active", 0)
        .build_input()
        .unwrap();
    params.set_value("id", 7).unwrap();
    params.set_value("name", "grace").unwrap();
    params.set_value("active", true).unwrap();

    let mut capture = CaptureParams::default();
    params.execute(&mut capture).unwrap();
    assert_eq!(capture.sent, ["7", "grace", "1"]);

    params.select_by_names(["active", "name"]).unwrap();
    params.set_null("name", true).unwrap();
    let mut capture = CaptureParams::default();
    params.execute(&mut capture).unwrap();
    assert_eq!(capture.sent, ["NULL", "1"]);
}

#[test]
fn test_values_written_after_build_reach_the_primitive() {
    init_tracing();
    let mut params = ColumnFactory::new()
        .declare(TypeTag::Int, "id", 0)
        .declare(TypeTag::VarChar, "name", 8)
        .build_input()
        .unwrap();
    params.rebuild();
    params.set_value("id", 7).unwrap();
    params.set_value("name", "ab").unwrap();

    let mut read = |d: &mut [BindDescriptor]| -> Result<()> {
        // SAFETY: both slots were attached by the rebuild above.
        unsafe {
            assert_eq!(*d[0].buffer.cast::<i32>(), 7);
            assert_eq!(*d[1].length, 2);
            let name = std::slice::from_raw_parts(d[1].buffer.cast::<u8>(), 2);
            assert_eq!(name, b"ab");
        }
        Ok(())
    };
    params.execute(&mut read).unwrap();

    // Between executions, without a rebuild.
    params.set_value("id", 8).unwrap();
    params.set_value("name", "cdef").unwrap();
    let mut capture = CaptureParams::default();
    params.execute(&mut capture).unwrap();
    assert_eq!(capture.sent, ["8", "cdef"]);
}

#[test]
fn test_values_written_after_reselection_reach_the_primitive() {
    let mut params = ColumnFactory::new()
        .declare(TypeTag::Int, "id", 0)
        .declare(TypeTag::VarChar, "name", 8)
        .declare(TypeTag::Boolean, "active", 0)
        .build_input()
        .unwrap();

    params.select_by_names(["name"]).unwrap();
    params.set_value("name", "xyz").unwrap();
    params.set_value("id", 9).unwrap();
    let mut capture = CaptureParams::default();
    params.execute(&mut capture).unwrap();
    assert_eq!(capture.sent, ["xyz"]);
    let slot = params.descriptor_for("name").unwrap().unwrap();
    assert_eq!(unsafe { *slot.length }, 3);

    params.select_all();
    params.set_value("id", -4).unwrap();
    params.set_null("name", true).unwrap();
    params.set_value("active", false).unwrap();
    let mut capture = CaptureParams::default();
    params.execute(&mut capture).unwrap();
    assert_eq!(capture.sent, ["-4", "NULL", "0"]);
}

#[test]
fn test_results_are_read_back() {
    init_tracing();
    let mut results = ColumnFactory::new()
        .declare(TypeTag::BigInt, "id", 0)
        .declare(TypeTag::Text, "title", 8)
        .declare(TypeTag::DateTime, "created", 0)
        .declare(TypeTag::Boolean, "done", 0)
        .build_output()
        .unwrap();

    let created = SqlTime::datetime(2024, 5, 6, 7, 8, 9);
    let mut stmt = FetchOneRow::new(vec![
        Cell::Int(-1),
        Cell::Text("write tests"),
        Cell::Time(created),
        Cell::Null,
    ]);
    results.execute(&mut stmt).unwrap();

    assert_eq!(*results.value::<i64>("id").unwrap(), -1);
    assert_eq!(results.value::<[u8]>("title").unwrap(), b"write te");
    assert_eq!(*results.value::<SqlTime>("created").unwrap(), created);
    assert!(results.column("done").unwrap().is_null());
    assert_eq!(results.column("done").unwrap().to_string(), "NULL");

    let title = results.column("title").unwrap();
    assert!(title.is_truncated());
    assert_eq!(title.core().reported_length(), 11);
    let truncated: Vec<&str> = results.truncated_columns().map(|c| c.name()).collect();
    assert_eq!(truncated, ["title"]);
    assert_eq!(
        results.check_native_errors().unwrap_err(),
        Error::NativeExecution {
            column: "title".to_string()
        }
    );
}

#[test]
fn test_error_flags_reset_between_executions() {
    let mut results = ColumnFactory::new()
        .declare(TypeTag::VarChar, "code", 4)
        .build_output()
        .unwrap();

    let mut long = FetchOneRow::new(vec![Cell::Text("TOOLONG")]);
    results.execute(&mut long).unwrap();
    assert_eq!(results.flagged_columns().count(), 1);

    let mut short = FetchOneRow::new(vec![Cell::Text("OK")]);
    results.execute(&mut short).unwrap();
    assert_eq!(results.flagged_columns().count(), 0);
    assert_eq!(results.value::<[u8]>("code").unwrap(), b"OK");
    assert!(results.check_native_errors().is_ok());
}

#[test]
fn test_narrowed_result_selection() {
    let mut results = ColumnFactory::new()
        .declare(TypeTag::Int, "a", 0)
        .declare(TypeTag::SmallInt, "b", 0)
        .declare(TypeTag::TinyInt, "c", 0)
        .build_output()
        .unwrap();
    results.select_by_names(["c", "a"]).unwrap();

    let mut stmt = FetchOneRow::new(vec![Cell::Int(100), Cell::Int(-3)]);
    results.execute(&mut stmt).unwrap();
    assert_eq!(stmt.calls, 1);
    assert_eq!(*results.value::<i32>("a").unwrap(), 100);
    assert_eq!(*results.value::<i8>("c").unwrap(), -3);
    assert_eq!(*results.value::<i16>("b").unwrap(), 0);

    results.select_all();
    let err = results.execute(&mut stmt).unwrap_err();
    assert!(matches!(err, Error::Statement { .. }));
}

#[test]
fn test_collection_from_schema() {
    init_tracing();
    let mut source = vec![TableSchema::new("accounts")
        .with_field(SchemaField::new("id", WireType::LongLong, UNSIGNED_FLAG, 20))
        .with_field(SchemaField::new("email", WireType::VarString, 0, 320))
        .with_field(SchemaField::new("avatar", WireType::Blob, BINARY_FLAG, 65_535))];
    let table = source.table("accounts").unwrap();

    let factory = ColumnFactory::from_table(&table, Default::default()).unwrap();
    let mut results = factory.build_output().unwrap();
    results.rebuild();

    let tags: Vec<TypeTag> = results.iter().map(|c| c.tag()).collect();
    assert_eq!(
        tags,
        [TypeTag::BigIntUnsigned, TypeTag::VarChar, TypeTag::Blob]
    );
    let slots = results.descriptors();
    assert!(slots[0].is_unsigned);
    assert_eq!(slots[1].buffer_type, WireType::VarString);
    assert_eq!(slots[1].buffer_length, 320);
    assert_eq!(slots[2].buffer_length, 65_535);

    let mut stmt = FetchOneRow::new(vec![
        Cell::Int(-1),
        Cell::Text("ada@example.com"),
        Cell::Null,
    ]);
    results.execute(&mut stmt).unwrap();
    assert_eq!(*results.value::<u64>("id").unwrap(), u64::MAX);
    assert_eq!(
        results.column("email").unwrap().to_string(),
        "ada@example.com"
    );
}

#[test]
fn test_stale_snapshot_is_detected() {
    let mut results = ColumnFactory::new()
        .declare(TypeTag::Int, "a", 0)
        .declare(TypeTag::Int, "b", 0)
        .build_output()
        .unwrap();
    assert!(results.snapshot().is_none());

    results.rebuild();
    let first = results.snapshot().unwrap();
    assert_eq!(first.len, 2);
    assert!(results.is_current(&first));

    results.select_by_names(["b"]).unwrap();
    assert!(!results.is_current(&first));
    let second = results.snapshot().unwrap();
    assert_eq!(second.len, 1);

    // The live array can be handed over as a raw pointer and count.
    let slot = unsafe { &*second.ptr };
    assert!(slot.is_attached());
    let b = results.column("b").unwrap();
    assert_eq!(b.core().attachment().unwrap().index, 0);
}
