//! Self-describing API documentation: `/openapi.json` and a `/docs` page.

use axum::{extract::State, response::Html, Json};
use serde_json::{json, Value};

use super::state::AppState;
use crate::config::AppConfig;

/// Routes listed on the docs page, as `(method, path, summary)`.
const ROUTES: &[(&str, &str, &str)] = &[
    ("GET", "/fact/{fact_id}", "Retrieve a Chuck Norris fact from its id"),
    ("PUT", "/fact/{fact_id}", "Update a Chuck Norris fact from its id"),
    ("DELETE", "/fact/{fact_id}", "Remove a Chuck Norris fact from its id"),
    (
        "GET",
        "/facts/",
        "Retrieve Chuck Norris facts, optionally filtered by repeated `ids`",
    ),
    ("POST", "/facts/", "Create a new fact from body"),
    ("GET", "/health", "Service and database health"),
];

/// GET /openapi.json
pub async fn openapi_spec(State(state): State<AppState>) -> Json<Value> {
    Json(openapi_document(&state.config))
}

/// GET /docs
pub async fn docs_page(State(state): State<AppState>) -> Html<String> {
    Html(render_docs(&state.config))
}

/// Build the OpenAPI 3 description of the service.
pub fn openapi_document(config: &AppConfig) -> Value {
    let fact_schema = json!({ "$ref": "#/components/schemas/Fact" });
    let fact_id_param = json!({
        "name": "fact_id",
        "in": "path",
        "required": true,
        "schema": { "type": "integer", "format": "int64" }
    });
    let ids_param = json!({
        "name": "ids",
        "in": "query",
        "required": false,
        "style": "form",
        "explode": true,
        "schema": { "type": "array", "items": { "type": "integer", "format": "int64" } }
    });
    let fact_body = json!({
        "required": true,
        "content": json_content(json!({ "$ref": "#/components/schemas/FactRequest" }))
    });

    let get_fact = json!({
        "tags": ["Facts"],
        "summary": ROUTES[0].2,
        "parameters": [fact_id_param.clone()],
        "responses": {
            "200": { "description": "The fact", "content": json_content(fact_schema.clone()) },
            "404": error_response("Fact not found"),
            "500": error_response("Store failure")
        }
    });
    let put_fact = json!({
        "tags": ["Facts"],
        "summary": ROUTES[1].2,
        "parameters": [fact_id_param.clone()],
        "requestBody": fact_body.clone(),
        "responses": {
            "204": { "description": "Fact updated" },
            "404": error_response("Fact not found"),
            "500": error_response("Store failure")
        }
    });
    let delete_fact = json!({
        "tags": ["Facts"],
        "summary": ROUTES[2].2,
        "parameters": [fact_id_param],
        "responses": {
            "204": { "description": "Fact deleted" },
            "403": error_response("Fact not found"),
            "500": error_response("Store failure")
        }
    });
    let get_facts = json!({
        "tags": ["Facts"],
        "summary": ROUTES[3].2,
        "parameters": [ids_param],
        "responses": {
            "200": {
                "description": "Matching facts",
                "content": json_content(json!({ "type": "array", "items": fact_schema.clone() }))
            },
            "404": error_response("None of the requested facts exist"),
            "500": error_response("Store failure")
        }
    });
    let post_fact = json!({
        "tags": ["Facts"],
        "summary": ROUTES[4].2,
        "requestBody": fact_body,
        "responses": {
            "201": { "description": "Fact created", "content": json_content(fact_schema) },
            "403": error_response("The store did not assign an id"),
            "500": error_response("Store failure")
        }
    });
    let health = json!({
        "summary": ROUTES[5].2,
        "responses": { "200": { "description": "Health report" } }
    });

    json!({
        "openapi": "3.0.3",
        "info": {
            "title": config.name,
            "description": config.description,
            "version": config.version
        },
        "paths": {
            "/fact/{fact_id}": { "get": get_fact, "put": put_fact, "delete": delete_fact },
            "/facts/": { "get": get_facts, "post": post_fact },
            "/health": { "get": health }
        },
        "components": { "schemas": component_schemas() }
    })
}

fn json_content(schema: Value) -> Value {
    json!({ "application/json": { "schema": schema } })
}

fn error_response(description: &str) -> Value {
    json!({
        "description": description,
        "content": json_content(json!({ "$ref": "#/components/schemas/ApiError" }))
    })
}

fn component_schemas() -> Value {
    let fact = json!({
        "type": "object",
        "required": ["id", "fact"],
        "properties": {
            "id": { "type": "integer", "format": "int64" },
            "fact": { "type": "string" }
        }
    });
    let fact_request = json!({
        "type": "object",
        "required": ["fact"],
        "properties": { "fact": { "type": "string" } }
    });
    let api_error = json!({
        "type": "object",
        "required": ["code", "message"],
        "properties": {
            "code": { "type": "string" },
            "message": { "type": "string" },
            "details": { "type": "string" }
        }
    });
    json!({ "Fact": fact, "FactRequest": fact_request, "ApiError": api_error })
}

fn render_docs(config: &AppConfig) -> String {
    let rows: String = ROUTES
        .iter()
        .map(|(method, path, summary)| {
            format!(
                "<tr><td><code>{}</code></td><td><code>{}</code></td><td>{}</td></tr>",
                method,
                escape_html(path),
                escape_html(summary)
            )
        })
        .collect();

    format!(
        "<!DOCTYPE html>\n<html><head><meta charset=\"utf-8\"><title>{title}</title></head>\
         <body><h1>{title} <small>{version}</small></h1><p>{description}</p>\
         <table><thead><tr><th>Method</th><th>Path</th><th>Description</th></tr></thead>\
         <tbody>{rows}</tbody></table>\
         <p>Machine-readable description: <a href=\"/openapi.json\">/openapi.json</a></p>\
         </body></html>",
        title = escape_html(&config.name),
        version = escape_html(&config.version),
        description = escape_html(&config.description),
        rows = rows,
    )
}

fn escape_html(raw: &str) -> String {
    raw.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openapi_uses_config_metadata() {
        let config = AppConfig {
            name: "Facts".to_string(),
            description: "All the facts".to_string(),
            ..AppConfig::default()
        };
        let doc = openapi_document(&config);
        assert_eq!(doc["info"]["title"], "Facts");
        assert_eq!(doc["info"]["description"], "All the facts");
        assert!(doc["paths"]["/fact/{fact_id}"]["delete"]["responses"]["403"].is_object());
        assert!(doc["paths"]["/facts/"]["post"]["responses"]["201"].is_object());
    }

    #[test]
    fn test_docs_page_escapes_config() {
        let config = AppConfig {
            name: "<Facts & co>".to_string(),
            ..AppConfig::default()
        };
        let page = render_docs(&config);
        assert!(page.contains("&lt;Facts &amp; co&gt;"));
        assert!(page.contains("/openapi.json"));
    }
}
