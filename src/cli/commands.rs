//! CLI command implementations
//!
//! Every command follows the same boot sequence:
//! 1. Configuration load and validation
//! 2. Log level applied
//! 3. Catalog resolved
//! 4. Data file loaded into the in-memory store
//!
//! then answers with exactly one JSON response on stdout.

use std::fs;
use std::path::Path;

use serde_json::{json, Value};

use crate::executor::CancellationFlag;
use crate::model::{parse_sort_key, Attribute, AttributeValue, Order, TimeWindow};
use crate::observability::{log_event_with_fields, Event, Logger, MetricsRegistry};
use crate::orders::OrderQueries;
use crate::planner::{Condition, ExplainPlan, IntentSpec};
use crate::schema::TableSchema;
use crate::store::InMemoryStore;

use super::args::Command;
use super::config::Config;
use super::errors::{CliError, CliResult};
use super::io::{read_request, write_error, write_response};

/// Main CLI entry point
///
/// Parses arguments and dispatches to the appropriate command.
/// This is the only function that main.rs should call.
pub fn run() -> CliResult<()> {
    let cli = super::args::Cli::parse_args();
    run_command(cli.command)
}

/// Run the appropriate command, reporting failures as an error response
pub fn run_command(cmd: Command) -> CliResult<()> {
    let name = command_name(&cmd);
    let result = match cmd {
        Command::Query { config } => query(&config),
        Command::Explain { config } => explain(&config),
        Command::TopCountries {
            config,
            product,
            from,
            to,
            seller,
        } => top_countries(&config, &product, &from, &to, seller.as_deref()),
        Command::Get { config, keys } => get(&config, &keys),
    };

    if let Err(e) = &result {
        let message = e.to_string();
        log_event_with_fields(
            Event::CommandFailed,
            &[
                ("code", e.code()),
                ("command", name),
                ("message", message.as_str()),
            ],
        );
        write_error(e.code(), &message)?;
    }
    result
}

fn command_name(cmd: &Command) -> &'static str {
    match cmd {
        Command::Query { .. } => "query",
        Command::Explain { .. } => "explain",
        Command::TopCountries { .. } => "top-countries",
        Command::Get { .. } => "get",
    }
}

/// A booted process: validated config, catalog and loaded store
pub struct Session {
    pub config: Config,
    pub schema: TableSchema,
    pub store: InMemoryStore,
    pub metrics: MetricsRegistry,
}

impl Session {
    /// Query facade with the configured page size, K and timeout
    pub fn queries(&self) -> OrderQueries<'_, InMemoryStore> {
        let queries = OrderQueries::new(&self.store, &self.schema)
            .with_top_k(self.config.top_k)
            .with_metrics(&self.metrics);
        match self.config.query_timeout() {
            Some(timeout) => queries.with_cancellation(CancellationFlag::with_timeout(timeout)),
            None => queries,
        }
    }
}

/// Loads config and data
pub fn boot(config_path: &Path) -> CliResult<Session> {
    let config = Config::load(config_path)?;
    Logger::set_min_severity(config.severity()?);

    let schema = config.table_schema()?;
    let config_file = config_path.display().to_string();
    log_event_with_fields(
        Event::ConfigLoaded,
        &[("path", config_file.as_str()), ("table", schema.name.as_str())],
    );

    let store = InMemoryStore::new(schema.clone()).with_page_size(config.page_size);
    let orders = load_orders(&config.data_file)?;
    let count = store
        .load(orders)
        .map_err(|e| CliError::Data(e.to_string()))?;

    let data_file = config.data_file.display().to_string();
    let count = count.to_string();
    log_event_with_fields(
        Event::DataLoaded,
        &[("orders", count.as_str()), ("path", data_file.as_str())],
    );

    Ok(Session {
        config,
        schema,
        store,
        metrics: MetricsRegistry::new(),
    })
}

/// Reads a JSON array of orders; every `order_time_rand` must be a
/// canonical sort key
pub fn load_orders(path: &Path) -> CliResult<Vec<Order>> {
    let content = fs::read_to_string(path)
        .map_err(|e| CliError::Data(format!("Failed to read {}: {}", path.display(), e)))?;
    let orders: Vec<Order> = serde_json::from_str(&content)
        .map_err(|e| CliError::Data(format!("Invalid data file {}: {}", path.display(), e)))?;

    for (i, order) in orders.iter().enumerate() {
        parse_sort_key(&order.order_time_rand).map_err(|e| {
            CliError::Data(format!("{}: order {}: {}", path.display(), i, e))
        })?;
    }
    Ok(orders)
}

/// Run one intent from stdin
pub fn query(config_path: &Path) -> CliResult<()> {
    let session = boot(config_path)?;
    let request = read_request()?;
    write_response(run_query(&session, request)?)
}

/// Explain one intent from stdin
pub fn explain(config_path: &Path) -> CliResult<()> {
    let session = boot(config_path)?;
    let request = read_request()?;
    write_response(run_explain(&session, request)?)
}

pub fn top_countries(
    config_path: &Path,
    product: &str,
    from: &str,
    to: &str,
    seller: Option<&str>,
) -> CliResult<()> {
    let session = boot(config_path)?;
    let window = TimeWindow::parse(from, to)?;
    let top = session.queries().top_countries(product, &window, seller)?;
    write_response(serde_json::to_value(top)?)
}

pub fn get(config_path: &Path, keys: &[String]) -> CliResult<()> {
    let session = boot(config_path)?;
    let conditions = keys
        .iter()
        .map(|pair| parse_key_pair(pair))
        .collect::<CliResult<Vec<_>>>()?;
    let order = session.queries().get_order(&conditions)?;
    write_response(serde_json::to_value(order)?)
}

pub(crate) fn run_query(session: &Session, request: Value) -> CliResult<Value> {
    let spec: IntentSpec = serde_json::from_value(request)?;
    let intent = spec.resolve()?;
    let orders = session.queries().find(&intent)?;
    Ok(json!({
        "count": orders.len(),
        "orders": orders,
    }))
}

/// A request the planner rejects is still explained, not failed
pub(crate) fn run_explain(session: &Session, request: Value) -> CliResult<Value> {
    let spec: IntentSpec = serde_json::from_value(request)?;
    let explain = match spec.resolve() {
        Ok(intent) => session.queries().explain(&intent),
        Err(err) => ExplainPlan::from_error(&err),
    };
    Ok(serde_json::to_value(explain)?)
}

/// Parses `attribute=value` into an equality condition
fn parse_key_pair(pair: &str) -> CliResult<Condition> {
    let (name, raw) = pair
        .split_once('=')
        .ok_or_else(|| CliError::Request(format!("Expected attribute=value, got '{}'", pair)))?;
    let attribute: Attribute = name.trim().parse()?;
    let value = if attribute.is_numeric() {
        AttributeValue::from_json(attribute, &Value::String(raw.to_string()))?
    } else {
        AttributeValue::String(raw.to_string())
    };
    Ok(Condition::eq(attribute, value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;
    use std::io::Write;
    use tempfile::TempDir;

    fn session(dir: &TempDir, schema: &str) -> Session {
        let data = json!([
            {
                "order_id": "o1", "seller_id": "s1",
                "order_time_rand": "2013-02-01T00:00:00Z#00000000000000000000000000000001",
                "customer_id": "c1", "product_id": "p1", "total_price": "2.5",
                "product_quantity": 2, "tax": "0.2", "country": "US"
            },
            {
                "order_id": "o2", "seller_id": "s1",
                "order_time_rand": "2013-03-01T00:00:00Z#00000000000000000000000000000002",
                "customer_id": "c2", "product_id": "p1", "total_price": 4,
                "product_quantity": 1, "tax": 0, "country": "FR"
            }
        ]);
        let mut file = fs::File::create(dir.path().join("orders.json")).unwrap();
        write!(file, "{}", data).unwrap();

        let config_path = dir.path().join("orderstore.json");
        let mut file = fs::File::create(&config_path).unwrap();
        write!(
            file,
            "{}",
            json!({ "data_file": "orders.json", "schema": schema, "log_level": "error" })
        )
        .unwrap();

        boot(&config_path).unwrap()
    }

    #[test]
    fn test_boot_loads_orders() {
        let dir = TempDir::new().unwrap();
        let session = session(&dir, "seller");
        assert_eq!(session.store.len().unwrap(), 2);
    }

    #[test]
    fn test_boot_missing_data_file() {
        let dir = TempDir::new().unwrap();
        let config_path = dir.path().join("orderstore.json");
        fs::write(&config_path, json!({ "data_file": "absent.json" }).to_string()).unwrap();

        let err = boot(&config_path).err().unwrap();
        assert_eq!(err.code(), "ORDERS_CLI_DATA_ERROR");
    }

    #[test]
    fn test_boot_rejects_malformed_sort_key() {
        let dir = TempDir::new().unwrap();
        let data = json!([{
            "order_id": "o1", "seller_id": "s1", "order_time_rand": "2013-02-01",
            "customer_id": "c1", "product_id": "p1", "total_price": 1,
            "product_quantity": 1, "tax": 0, "country": "US"
        }]);
        fs::write(dir.path().join("orders.json"), data.to_string()).unwrap();
        let config_path = dir.path().join("orderstore.json");
        fs::write(&config_path, json!({ "data_file": "orders.json" }).to_string()).unwrap();

        let err = boot(&config_path).err().unwrap();
        assert_eq!(err.code(), "ORDERS_CLI_DATA_ERROR");
    }

    #[test]
    fn test_run_query_scan() {
        let dir = TempDir::new().unwrap();
        let session = session(&dir, "seller");
        let response = run_query(
            &session,
            json!({
                "kind": "scan",
                "filter": { "attribute": "total_price", "op": "gt", "value": 3 }
            }),
        )
        .unwrap();

        assert_eq!(response["count"], 1);
        assert_eq!(response["orders"][0]["order_id"], "o2");
    }

    #[test]
    fn test_run_query_rejects_unsupported_operator() {
        let dir = TempDir::new().unwrap();
        let session = session(&dir, "seller");
        let err = run_query(
            &session,
            json!({
                "kind": "lookup",
                "partition": { "attribute": "seller_id", "op": "gt", "value": "s" }
            }),
        )
        .unwrap_err();
        assert_eq!(err.code(), "ORDERS_UNSUPPORTED_OPERATOR");
    }

    #[test]
    fn test_run_explain_reports_rejection() {
        let dir = TempDir::new().unwrap();
        let session = session(&dir, "seller");
        let response = run_explain(
            &session,
            json!({
                "kind": "scan",
                "filter": { "attribute": "country", "op": "lte", "value": "US" }
            }),
        )
        .unwrap();

        assert_eq!(response["accepted"], false);
        assert_eq!(response["rejection_code"], "ORDERS_UNSUPPORTED_OPERATOR");
    }

    #[test]
    fn test_get_by_order_id() {
        let dir = TempDir::new().unwrap();
        let session = session(&dir, "order_id");
        let conditions = vec![parse_key_pair("order_id=o2").unwrap()];

        let order = session.queries().get_order(&conditions).unwrap().unwrap();
        assert_eq!(order.country, "FR");
    }

    #[test]
    fn test_parse_key_pair_errors() {
        assert!(matches!(parse_key_pair("seller_id"), Err(CliError::Request(_))));
        assert_eq!(
            parse_key_pair("shipping=x").unwrap_err().code(),
            "ORDERS_CLI_INVALID_REQUEST"
        );
        assert!(parse_key_pair("total_price=abc").is_err());
        assert_eq!(
            parse_key_pair("total_price=2.5").unwrap(),
            Condition::eq(Attribute::TotalPrice, Decimal::new(25, 1))
        );
    }
}
