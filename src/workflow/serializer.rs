use crate::error::FlowResult;
use crate::store::StoreValue;
use crate::workflow::graph::{FlowElement, FlowGraph};
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

/// Deadline fields under `businessData` that the backend expects as numbers.
const TIME_RULE_NUMBER_PATHS: [&[&str]; 9] = [
    &["basicConfig", "timeRule", "deadLine", "day"],
    &["basicConfig", "timeRule", "deadLine", "hours"],
    &["basicConfig", "timeRule", "deadLine", "minutes"],
    &["basicConfig", "timeRule", "deadLine", "urge", "day"],
    &["basicConfig", "timeRule", "deadLine", "urge", "hours"],
    &["basicConfig", "timeRule", "deadLine", "urge", "minutes"],
    &["basicConfig", "timeRule", "deadLine", "urge", "repeat", "day"],
    &["basicConfig", "timeRule", "deadLine", "urge", "repeat", "hours"],
    &["basicConfig", "timeRule", "deadLine", "urge", "repeat", "minutes"],
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveWorkFlow {
    pub bpmn_text: String,
    pub name: String,
    pub trigger_mode: String,
    pub can_cancel: u8,
    pub can_urge: u8,
    pub can_msg: u8,
    pub can_view_status_msg: u8,
    pub app_id: String,
}

pub fn to_json(graph: &FlowGraph) -> FlowResult<String> {
    Ok(serde_json::to_string_pretty(graph)?)
}

pub fn from_json(raw: &str) -> FlowResult<FlowGraph> {
    Ok(serde_json::from_str::<FlowGraph>(raw)?)
}

pub fn build_work_flow_save_data(
    value: &StoreValue,
    app_id: &str,
    overrides: &Map<String, Value>,
) -> FlowResult<SaveWorkFlow> {
    Ok(SaveWorkFlow {
        bpmn_text: build_bpmn_text(
            &value.version,
            &value.elements,
            &value.node_id_for_drawer_form,
            overrides,
        )?,
        name: value.name.clone(),
        trigger_mode: value.trigger_mode.clone(),
        can_cancel: value.cancelable as u8,
        can_urge: value.urgeable as u8,
        can_msg: value.node_admin_msg as u8,
        can_view_status_msg: value.see_status_and_msg as u8,
        app_id: app_id.to_string(),
    })
}

/// Renders the persisted workflow document. `overrides` are merged into the
/// business data of the node currently open in the drawer (`node_id`).
pub fn build_bpmn_text(
    version: &str,
    graph: &FlowGraph,
    node_id: &str,
    overrides: &Map<String, Value>,
) -> FlowResult<String> {
    let mut shapes = Vec::with_capacity(graph.elements().len());
    for element in graph.elements() {
        let mut shape = serde_json::to_value(element)?;
        if let FlowElement::Node(node) = element {
            if node.id == node_id {
                merge_business_data(&mut shape, overrides);
            }
            if node.id == node_id || node.kind.has_time_rule() {
                if let Some(data) = shape.get_mut("data").and_then(Value::as_object_mut) {
                    data.remove("type");
                }
            }
            if node.kind.has_time_rule() {
                if let Some(business_data) = shape.pointer_mut("/data/businessData") {
                    for path in TIME_RULE_NUMBER_PATHS {
                        coerce_number_at(business_data, path);
                    }
                }
            }
        }
        shapes.push(shape);
    }

    tracing::debug!(version, shapes = shapes.len(), "built workflow document");
    Ok(serde_json::to_string(&json!({
        "version": version,
        "shapes": shapes,
    }))?)
}

fn merge_business_data(shape: &mut Value, overrides: &Map<String, Value>) {
    let Some(data) = shape.get_mut("data").and_then(Value::as_object_mut) else {
        return;
    };
    let business_data = data
        .entry("businessData")
        .or_insert_with(|| Value::Object(Map::new()));
    if !business_data.is_object() {
        *business_data = Value::Object(Map::new());
    }
    if let Value::Object(fields) = business_data {
        for (key, value) in overrides {
            fields.insert(key.clone(), value.clone());
        }
    }
}

fn coerce_number_at(root: &mut Value, path: &[&str]) {
    let mut current = root;
    for key in path {
        match current.get_mut(*key) {
            Some(next) => current = next,
            None => return,
        }
    }
    let coerced = to_number(current);
    *current = coerced;
}

/// Numeric coercion matching what the form layer submits: blank strings and
/// null become 0, booleans become 0/1, `0x`/`0o`/`0b` literals are read in
/// their radix, whole numbers are emitted as integers and anything
/// unparsable becomes null.
fn to_number(value: &Value) -> Value {
    match value {
        Value::Number(_) => value.clone(),
        Value::Null => json!(0),
        Value::Bool(flag) => json!(*flag as u8),
        Value::String(raw) => parse_number(raw.trim()),
        Value::Array(_) | Value::Object(_) => Value::Null,
    }
}

fn parse_number(raw: &str) -> Value {
    if raw.is_empty() {
        return json!(0);
    }
    for (prefix, radix) in [("0x", 16), ("0o", 8), ("0b", 2)] {
        let digits = raw
            .strip_prefix(prefix)
            .or_else(|| raw.strip_prefix(&prefix.to_uppercase()));
        if let Some(digits) = digits {
            return u64::from_str_radix(digits, radix)
                .map(|whole| json!(whole))
                .unwrap_or(Value::Null);
        }
    }
    if let Ok(whole) = raw.parse::<i64>() {
        return json!(whole);
    }
    match raw.parse::<f64>() {
        Ok(number) if number.is_finite() => {
            if number.fract() == 0.0 && number.abs() <= MAX_SAFE_INTEGER {
                json!(number as i64)
            } else {
                serde_json::Number::from_f64(number)
                    .map(Value::Number)
                    .unwrap_or(Value::Null)
            }
        }
        _ => Value::Null,
    }
}

/// Largest integer an f64 holds exactly.
const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_991.0;
