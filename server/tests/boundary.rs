/*
 * EDFlow
 * Copyright (c) 2026 EDFlow Contributors
 *
 * This program is free software: you can redistribute it and/or modify
 * it under the terms of the GNU Affero General Public License as published by
 * the Free Software Foundation, either version 3 of the License, or
 * (at your option) any later version.
 *
 * This program is distributed in the hope that it will be useful,
 * but WITHOUT ANY WARRANTY; without even the implied warranty of
 * MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
 * GNU Affero General Public License for more details.
 *
 * You should have received a copy of the GNU Affero General Public License
 * along with this program.  If not, see <http://www.gnu.org/licenses/>.
 *
 */

use axum::body::Body;
use axum::http::{Request, StatusCode};
use clap::Parser;
use edflow_server::build_app;
use edflow_server::settings::Settings;
use tower::ServiceExt;

fn test_app() -> axum::Router {
    let settings = Settings::parse_from(["edflow-server"]);
    let (_state, app) = build_app(&settings);
    app
}

#[tokio::test]
async fn status_without_session_id_returns_422() {
    let app = test_app();
    let response = app.oneshot(Request::builder().uri("/status").body(Body::empty()).unwrap()).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn status_with_unknown_session_id_creates_it_and_succeeds() {
    let app = test_app();
    let response =
        app.oneshot(Request::builder().uri("/status?session_id=new-session").body(Body::empty()).unwrap()).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn alerts_without_session_id_returns_422() {
    let app = test_app();
    let response = app.oneshot(Request::builder().uri("/alerts").body(Body::empty()).unwrap()).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn facilities_without_session_id_returns_422() {
    let app = test_app();
    let response = app.oneshot(Request::builder().uri("/facilities").body(Body::empty()).unwrap()).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn health_never_requires_a_session() {
    let app = test_app();
    let response = app.oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap()).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}
