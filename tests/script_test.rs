use std::cell::RefCell;
use std::collections::HashMap;
use std::io::Write;
use std::rc::Rc;

use anyhow::Result;
use qbridge::render::Status;
use qbridge::script::{CONNECTION_FAILED_MESSAGE, NOTHING_TO_EXECUTE_MESSAGE};
use qbridge::{
    Atom, Column, Config, Connector, ContextStore, EngineError, Interpreter, QueryEngine, Table,
    Value,
};

/// Scripted engine: canned responses per expression, recorded `set` calls.
#[derive(Default)]
struct MockEngine {
    responses: HashMap<String, Value>,
    sets: Rc<RefCell<Vec<(String, Value)>>>,
}

impl QueryEngine for MockEngine {
    fn eval(&mut self, expr: &str) -> Result<Value, EngineError> {
        Ok(self.responses.get(expr).cloned().unwrap_or(Value::Null))
    }

    fn set(&mut self, name: &str, value: &Value) -> Result<(), EngineError> {
        self.sets.borrow_mut().push((name.to_string(), value.clone()));
        Ok(())
    }
}

#[derive(Default)]
struct MockConnector {
    responses: HashMap<String, Value>,
    sets: Rc<RefCell<Vec<(String, Value)>>>,
}

impl MockConnector {
    fn with_response(expr: &str, value: Value) -> Self {
        let mut responses = HashMap::new();
        responses.insert(expr.to_string(), value);
        Self { responses, sets: Rc::default() }
    }
}

impl Connector for MockConnector {
    fn connect(&self) -> Result<Box<dyn QueryEngine>, EngineError> {
        Ok(Box::new(MockEngine {
            responses: self.responses.clone(),
            sets: Rc::clone(&self.sets),
        }))
    }
}

struct FailingConnector;

impl Connector for FailingConnector {
    fn connect(&self) -> Result<Box<dyn QueryEngine>, EngineError> {
        Err(EngineError::Connection("host unreachable".into()))
    }
}

fn trades() -> Value {
    Value::Table(Table::new(
        vec!["sym".into(), "price".into()],
        vec![
            Column::Symbol(vec!["A".into(), "B".into()]),
            Column::Real(vec![1.5, 2.5]),
        ],
    ))
}

#[test]
fn last_statement_wins() -> Result<()> {
    let mut connector = MockConnector::default();
    connector
        .responses
        .insert("1+1".into(), Value::Atom(Atom::Long(2)));
    connector
        .responses
        .insert("2+2".into(), Value::Atom(Atom::Long(4)));

    let interp = Interpreter::new(1000)?;
    let mut ctx = ContextStore::new();
    let out = interp.execute_script("1+1\n2+2", &connector, &mut ctx);
    assert_eq!(out.status, Status::Success);
    assert_eq!(out.payload, "4");
    Ok(())
}

#[test]
fn comments_and_blank_lines_are_skipped() -> Result<()> {
    let connector = MockConnector::with_response("count t", Value::Atom(Atom::Long(7)));
    let interp = Interpreter::new(1000)?;
    let mut ctx = ContextStore::new();
    let out = interp.execute_script("/ header comment\n\ncount t\n/ trailing", &connector, &mut ctx);
    assert_eq!(out.payload, "7");
    Ok(())
}

#[test]
fn comment_only_script_is_nothing_to_execute() -> Result<()> {
    let connector = MockConnector::default();
    let interp = Interpreter::new(1000)?;
    let mut ctx = ContextStore::new();
    let out = interp.execute_script("/ just a comment\n/ another", &connector, &mut ctx);
    assert_eq!(out.status, Status::Error);
    assert_eq!(out.payload, NOTHING_TO_EXECUTE_MESSAGE);
    Ok(())
}

#[test]
fn connection_failure_uses_the_fixed_message() -> Result<()> {
    let interp = Interpreter::new(1000)?;
    let mut ctx = ContextStore::new();
    let out = interp.execute_script("1+1", &FailingConnector, &mut ctx);
    assert_eq!(out.status, Status::Error);
    assert_eq!(out.payload, CONNECTION_FAILED_MESSAGE);
    Ok(())
}

#[test]
fn backend_error_value_surfaces_verbatim() -> Result<()> {
    let connector = MockConnector::with_response("boom", Value::Error("type".into()));
    let interp = Interpreter::new(1000)?;
    let mut ctx = ContextStore::new();
    let out = interp.execute_script("boom", &connector, &mut ctx);
    assert_eq!(out.status, Status::Error);
    assert_eq!(out.payload, "type");
    Ok(())
}

#[test]
fn malformed_result_becomes_an_error_envelope() -> Result<()> {
    let ragged = Value::Table(Table::new(
        vec!["a".into(), "b".into()],
        vec![Column::Long(vec![1, 2]), Column::Long(vec![1])],
    ));
    let connector = MockConnector::with_response("t", ragged);
    let interp = Interpreter::new(1000)?;
    let mut ctx = ContextStore::new();
    let out = interp.execute_script("t", &connector, &mut ctx);
    assert_eq!(out.status, Status::Error);
    assert!(out.payload.contains("malformed table"), "{}", out.payload);
    Ok(())
}

#[test]
fn context_put_stores_and_returns_the_rendered_result() -> Result<()> {
    let connector = MockConnector::with_response("select from t", trades());
    let interp = Interpreter::new(1000)?;
    let mut ctx = ContextStore::new();
    let out = interp.execute_script(".ctx.trades:select from t", &connector, &mut ctx);
    assert_eq!(out.status, Status::Success);
    assert_eq!(out.payload, "sym\tprice\nA\t1.5\nB\t2.5\n");

    let stored = ctx.get("trades").expect("stored entry");
    assert_eq!(stored.text, out.payload);
    Ok(())
}

#[test]
fn context_get_binds_the_stored_table_on_the_engine() -> Result<()> {
    let connector = MockConnector::with_response("select from t", trades());
    let interp = Interpreter::new(1000)?;
    let mut ctx = ContextStore::new();

    let put = interp.execute_script(".ctx.trades:select from t", &connector, &mut ctx);
    assert_eq!(put.status, Status::Success);

    let get = interp.execute_script("t2:.ctx.trades\ncount t2", &connector, &mut ctx);
    assert_eq!(get.status, Status::Success);

    let sets = connector.sets.borrow();
    assert_eq!(sets.len(), 1);
    let (name, value) = &sets[0];
    assert_eq!(name, "t2");
    match value {
        Value::Table(t) => {
            assert_eq!(t.names, vec!["sym", "price"]);
            assert_eq!(t.columns[0], Column::Str(vec!["A".into(), "B".into()]));
        }
        other => panic!("expected a table, got {:?}", other),
    }
    Ok(())
}

#[test]
fn context_get_of_unknown_name_is_an_error() -> Result<()> {
    let connector = MockConnector::default();
    let interp = Interpreter::new(1000)?;
    let mut ctx = ContextStore::new();
    let out = interp.execute_script("t2:.ctx.missing", &connector, &mut ctx);
    assert_eq!(out.status, Status::Error);
    assert!(out.payload.contains("missing"), "{}", out.payload);
    Ok(())
}

#[test]
fn marker_line_that_is_no_command_evaluates_as_a_query() -> Result<()> {
    let connector =
        MockConnector::with_response("select .ctx.x from t", Value::Atom(Atom::Long(3)));
    let interp = Interpreter::new(1000)?;
    let mut ctx = ContextStore::new();
    let out = interp.execute_script("select .ctx.x from t", &connector, &mut ctx);
    assert_eq!(out.status, Status::Success);
    assert_eq!(out.payload, "3");
    Ok(())
}

#[test]
fn truncation_notice_flows_through_the_script_runner() -> Result<()> {
    let connector = MockConnector::with_response("select from t", trades());
    let interp = Interpreter::new(1)?;
    let mut ctx = ContextStore::new();
    let out = interp.execute_script("select from t", &connector, &mut ctx);
    assert_eq!(out.status, Status::Success);
    assert_eq!(out.notice.as_deref(), Some("Shows only 1 rows"));
    assert_eq!(out.payload, "sym\tprice\nA\t1.5\n");
    Ok(())
}

#[test]
fn zero_max_rows_is_rejected() {
    assert!(Interpreter::new(0).is_err());
}

#[test]
fn max_rows_comes_from_the_property_store() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let rc = dir.path().join("qbridgerc");
    let mut f = std::fs::File::create(&rc)?;
    writeln!(f, "# test overrides")?;
    writeln!(f, "Q_MAX_ROWS = 7")?;
    drop(f);

    let cfg = Config::load_from(rc);
    let interp = Interpreter::from_config(&cfg)?;
    assert_eq!(interp.max_rows(), 7);
    Ok(())
}

#[test]
fn default_max_rows_is_one_thousand() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let cfg = Config::load_from(dir.path().join("absent"));
    let interp = Interpreter::from_config(&cfg)?;
    assert_eq!(interp.max_rows(), 1000);
    Ok(())
}

#[test]
fn server_properties_come_from_the_property_store() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let rc = dir.path().join("qbridgerc");
    std::fs::write(
        &rc,
        "Q_SERVER_HOST=qhost\nQ_SERVER_PORT=6001\nQ_SERVER_USER=alice\nQ_SERVER_PASSWORD=secret\n",
    )?;

    let cfg = Config::load_from(rc);
    assert_eq!(cfg.host().as_deref(), Some("qhost"));
    assert_eq!(cfg.port(), Some(6001));
    let (user, password) = cfg.credentials();
    assert_eq!(user.as_deref(), Some("alice"));
    assert_eq!(password.as_deref(), Some("secret"));
    Ok(())
}

#[test]
fn server_properties_have_defaults_but_no_credentials() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let cfg = Config::load_from(dir.path().join("absent"));
    assert_eq!(cfg.host().as_deref(), Some("localhost"));
    assert_eq!(cfg.port(), Some(5000));
    let (user, password) = cfg.credentials();
    assert!(user.is_none());
    assert!(password.is_none());
    Ok(())
}

#[test]
fn unparsable_max_rows_is_an_error() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let rc = dir.path().join("qbridgerc");
    std::fs::write(&rc, "Q_MAX_ROWS=plenty\n")?;
    let cfg = Config::load_from(rc);
    assert!(Interpreter::from_config(&cfg).is_err());
    Ok(())
}
