use serde_json::json;
use stateloom::api::ApiBuilder;
use stateloom::logging::JsonlSink;
use stateloom::types::Context;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let engine = ApiBuilder::new(JsonlSink::default(), JsonlSink::default()).build();

    let plan = json!({
        "description": "maintain group/item inverse indexes",
        "when": [{
            "if": {
                "properties": {
                    "event": {"properties": {"add": {"const": true}}, "required": ["add"]}
                }
            },
            "then": {"ops": [
                {"op": "set", "path": "/index/byGroup/{event.groupId}", "value": {"valueFrom": "event.itemId"}},
                {"op": "set", "path": "/index/byItem/{event.itemId}", "value": {"valueFrom": "event.groupId"}}
            ]},
            "else": {"ops": [
                {"op": "remove", "path": "/index/byGroup/{event.groupId}"},
                {"op": "remove", "path": "/index/byItem/{event.itemId}"}
            ]}
        }]
    });

    let mut ctx = Context::new(
        json!({"add": true, "groupId": "G1", "itemId": "I1"}),
        json!({"index": {}}),
    );
    let report = engine.transform(&plan, &mut ctx)?;

    println!("applied patch: {}", serde_json::to_string(&report.ops)?);
    println!("state: {}", serde_json::to_string_pretty(&ctx.state)?);
    Ok(())
}
