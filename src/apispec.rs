use serde_json::{Map, Value, json};

use crate::models::Report;

pub const APISPEC_PATH: &str = "/apispec_1.json";
pub const API_TITLE: &str = "API EMBRAPA";

/// Swagger 2.0 description of every route the worker serves.
pub fn document() -> Value {
    let mut paths = Map::new();
    for report in Report::ALL {
        paths.insert(report.path().to_string(), report_operation(report));
    }
    paths.insert("/login".to_string(), login_operation());

    json!({
        "swagger": "2.0",
        "info": {
            "title": API_TITLE,
            "description": "Tables from the Embrapa VitiBrasil site, served as JSON.",
            "version": env!("CARGO_PKG_VERSION"),
        },
        "securityDefinitions": {
            "Bearer": {
                "type": "apiKey",
                "name": "Authorization",
                "in": "header",
                "description": "Access token from /login, sent as 'Bearer <token>'.",
            }
        },
        "definitions": {
            "Error": {
                "type": "object",
                "properties": {
                    "code": { "type": "string" },
                    "message": { "type": "string" },
                },
            }
        },
        "paths": paths,
    })
}

fn report_operation(report: Report) -> Value {
    json!({
        "get": {
            "tags": [report.label()],
            "summary": format!("Extract {} tables from the VitiBrasil site", report.label()),
            "produces": ["application/json"],
            "security": [{ "Bearer": [] }],
            "responses": {
                "200": {
                    "description": "Records of every table keyed as table_1, table_2, ...",
                    "schema": {
                        "type": "object",
                        "additionalProperties": {
                            "type": "array",
                            "items": {
                                "type": "object",
                                "additionalProperties": { "type": "string" },
                            },
                        },
                    },
                },
                "401": {
                    "description": "Missing bearer token",
                    "schema": { "$ref": "#/definitions/Error" },
                },
                "500": {
                    "description": "No table data could be obtained",
                    "schema": { "$ref": "#/definitions/Error" },
                },
                "502": {
                    "description": "Source page could not be fetched or decoded",
                    "schema": { "$ref": "#/definitions/Error" },
                },
            },
        }
    })
}

fn login_operation() -> Value {
    json!({
        "post": {
            "tags": ["auth"],
            "summary": "User login to get a JWT",
            "produces": ["application/json"],
            "parameters": [
                {
                    "name": "username",
                    "in": "query",
                    "type": "string",
                    "required": true,
                    "description": "The username of the user",
                },
                {
                    "name": "password",
                    "in": "query",
                    "type": "string",
                    "required": true,
                    "description": "The password of the user",
                },
            ],
            "responses": {
                "200": {
                    "description": "JWT token",
                    "schema": {
                        "type": "object",
                        "properties": { "access_token": { "type": "string" } },
                    },
                },
                "401": {
                    "description": "Invalid credentials",
                    "schema": { "$ref": "#/definitions/Error" },
                },
            },
        }
    })
}

/// Swagger UI page that renders [`document`].
pub fn ui_page() -> String {
    format!(
        r##"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8">
  <title>{API_TITLE}</title>
  <link rel="stylesheet" href="https://unpkg.com/swagger-ui-dist@5/swagger-ui.css">
</head>
<body>
  <div id="swagger-ui"></div>
  <script src="https://unpkg.com/swagger-ui-dist@5/swagger-ui-bundle.js"></script>
  <script>
    window.ui = SwaggerUIBundle({{ url: "{APISPEC_PATH}", dom_id: "#swagger-ui" }});
  </script>
</body>
</html>
"##
    )
}
