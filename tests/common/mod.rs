#![allow(dead_code)]

use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::http::{header, Request, StatusCode};
use axum::Router;
use serde_json::Value;
use tower::ServiceExt;
use viemo::modules::content::memory::MemoryContentStore;
use viemo::modules::content::model::{Content, ContentKind};
use viemo::state::AppState;

pub struct TestApp {
    pub router: Router,
    pub state: AppState,
    pub store: MemoryContentStore,
}

pub struct TestResponse {
    pub status: StatusCode,
    pub set_cookie: Option<String>,
    pub body: Value,
}

impl TestResponse {
    pub fn data(&self) -> &Value {
        &self.body["data"]
    }

    pub fn titles(&self) -> Vec<String> {
        self.data()
            .as_array()
            .map(|items| {
                items
                    .iter()
                    .filter_map(|i| i["title"].as_str().map(str::to_string))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// `name=value` part of the Set-Cookie header, ready to send back.
    pub fn cookie_pair(&self) -> Option<String> {
        self.set_cookie
            .as_deref()
            .and_then(|c| c.split(';').next())
            .map(str::to_string)
    }
}

pub async fn spawn_app(items: Vec<Content>) -> TestApp {
    let store = MemoryContentStore::with_items(items);
    let state = AppState::with_store(Arc::new(store.clone()));
    let router = viemo::app::create_app(state.clone()).await;
    TestApp { router, state, store }
}

impl TestApp {
    pub async fn send(&self, request: Request<Body>) -> TestResponse {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let set_cookie = response
            .headers()
            .get(header::SET_COOKIE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);

        TestResponse { status, set_cookie, body }
    }

    pub async fn get(&self, uri: &str) -> TestResponse {
        self.send(Request::get(uri).body(Body::empty()).unwrap()).await
    }

    pub async fn get_with_cookie(&self, uri: &str, cookie: Option<&str>) -> TestResponse {
        let mut builder = Request::get(uri);
        if let Some(cookie) = cookie {
            builder = builder.header(header::COOKIE, cookie);
        }
        self.send(builder.body(Body::empty()).unwrap()).await
    }

    pub async fn json(&self, method: &str, uri: &str, body: Value) -> TestResponse {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        self.send(request).await
    }
}

pub fn movie(title: &str, genre: &str) -> Content {
    Content::new(ContentKind::Movie, title).with_genre(genre)
}

pub fn series(title: &str, genre: &str) -> Content {
    Content::new(ContentKind::Series, title).with_genre(genre)
}

pub fn popular(title: &str, rank: i32) -> Content {
    let mut c = Content::new(ContentKind::Movie, title);
    c.is_popular = true;
    c.popularity_rank = Some(rank);
    c
}
