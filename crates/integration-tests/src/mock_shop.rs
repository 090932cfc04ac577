//! In-process storefront API.
//!
//! Speaks the same `{success, message?, ...}` envelope as the real server,
//! keyed by script (`auth.php`, `products.php`, `cart.php`) and `action`.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use axum::body::{Body, Bytes};
use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, Method, Response, StatusCode, header};
use axum::routing::any;
use rust_decimal::Decimal;
use serde_json::{Value, json};
use tokio::net::TcpListener;
use tokio::sync::Mutex;
use url::Url;
use uuid::Uuid;

use threadline_storefront::StorefrontConfig;

/// Name of the session cookie the mock hands out.
pub const SESSION_COOKIE: &str = "THREADLINE_SESSID";

/// A request as the mock received it.
#[derive(Debug, Clone)]
pub struct CapturedRequest {
    pub method: Method,
    pub script: String,
    pub action: String,
    pub query: HashMap<String, String>,
    pub content_type: Option<String>,
    pub headers: HeaderMap,
    /// Parsed JSON body, `Value::Null` when empty.
    pub body: Value,
}

#[derive(Debug, Clone)]
struct User {
    id: i32,
    first_name: String,
    last_name: String,
    username: String,
    email: String,
    password: String,
}

impl User {
    fn to_json(&self) -> Value {
        json!({
            "id": self.id.to_string(),
            "first_name": self.first_name,
            "last_name": self.last_name,
            "username": self.username,
            "email": self.email,
        })
    }
}

#[derive(Debug, Clone)]
struct Line {
    id: i32,
    product_id: i32,
    quantity: u32,
    size: String,
    color: String,
}

#[derive(Debug, Default)]
struct Session {
    user_id: Option<i32>,
    cart: Vec<Line>,
}

#[derive(Debug)]
struct Shop {
    users: Vec<User>,
    products: Vec<Value>,
    sessions: HashMap<String, Session>,
    next_user_id: i32,
    next_line_id: i32,
    requests: Vec<CapturedRequest>,
    last_session: Option<String>,
    garbled: bool,
    fail_logout: bool,
}

type SharedShop = Arc<Mutex<Shop>>;

/// Mock storefront API server.
pub struct MockShop {
    pub addr: SocketAddr,
    shop: SharedShop,
    shutdown: tokio::sync::watch::Sender<bool>,
}

impl MockShop {
    /// Start a server seeded with one shopper and a small catalog.
    ///
    /// The seeded shopper is `ada@example.com` / `correct horse`.
    pub async fn start() -> Self {
        let shop = Arc::new(Mutex::new(Shop {
            users: vec![User {
                id: 1,
                first_name: "Ada".to_string(),
                last_name: "Lovelace".to_string(),
                username: "ada".to_string(),
                email: "ada@example.com".to_string(),
                password: "correct horse".to_string(),
            }],
            products: seed_products(),
            sessions: HashMap::new(),
            next_user_id: 2,
            next_line_id: 100,
            requests: Vec::new(),
            last_session: None,
            garbled: false,
            fail_logout: false,
        }));

        let (shutdown_tx, mut shutdown_rx) = tokio::sync::watch::channel(false);

        let app = Router::new()
            .route("/api/{script}", any(handle_request))
            .with_state(Arc::clone(&shop));

        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind mock shop");
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async move {
                    let _ = shutdown_rx.changed().await;
                })
                .await
                .ok();
        });

        Self {
            addr,
            shop,
            shutdown: shutdown_tx,
        }
    }

    /// API base URL, with trailing slash.
    pub fn api_base(&self) -> Url {
        Url::parse(&format!("http://{}/api/", self.addr)).unwrap()
    }

    /// Client configuration pointing at this server.
    pub fn config(&self) -> StorefrontConfig {
        StorefrontConfig::new(self.api_base())
    }

    /// Every request received so far.
    pub async fn requests(&self) -> Vec<CapturedRequest> {
        self.shop.lock().await.requests.clone()
    }

    /// `script?action` of every request received so far.
    pub async fn actions(&self) -> Vec<String> {
        self.shop
            .lock()
            .await
            .requests
            .iter()
            .map(|r| format!("{}?{}", r.script, r.action))
            .collect()
    }

    /// Answer every request with an HTML error page instead of JSON.
    pub async fn set_garbled(&self, garbled: bool) {
        self.shop.lock().await.garbled = garbled;
    }

    /// Make `auth.php?action=logout` declare failure.
    pub async fn set_fail_logout(&self, fail: bool) {
        self.shop.lock().await.fail_logout = fail;
    }

    /// Number of server-side sessions created.
    pub async fn session_count(&self) -> usize {
        self.shop.lock().await.sessions.len()
    }

    /// The cart as `get` would report it for the session of the most recent
    /// request.
    pub async fn current_cart(&self) -> Value {
        let shop = self.shop.lock().await;
        let session = shop
            .last_session
            .as_ref()
            .and_then(|sid| shop.sessions.get(sid))
            .expect("no session yet");
        shop.cart_json(session)
    }

    /// Stop the server.
    pub fn stop(&self) {
        let _ = self.shutdown.send(true);
    }
}

impl Drop for MockShop {
    fn drop(&mut self) {
        self.stop();
    }
}

fn seed_products() -> Vec<Value> {
    vec![
        json!({"id": "1", "name": "Classic Tee", "image": "img/tee.png", "price": "19.99",
               "sale_price": "", "avg_rating": null, "category_id": "1",
               "description": "Heavyweight cotton tee"}),
        json!({"id": "2", "name": "Denim Jacket", "image": "img/jacket.png", "price": "59.00",
               "sale_price": "49.00", "avg_rating": "4.5", "category_id": "2",
               "description": "Stonewashed denim"}),
        json!({"id": "3", "name": "Wool Beanie", "image": "", "price": "15.00",
               "sale_price": null, "avg_rating": 3, "category_id": "3",
               "description": ""}),
    ]
}

fn decimal(value: &Value) -> Option<Decimal> {
    match value {
        Value::String(s) => s.parse().ok(),
        Value::Number(n) => n.to_string().parse().ok(),
        _ => None,
    }
}

impl Shop {
    fn product(&self, id: i32) -> Option<&Value> {
        let id = id.to_string();
        self.products.iter().find(|p| p["id"] == id.as_str())
    }

    fn user(&self, id: i32) -> Option<&User> {
        self.users.iter().find(|u| u.id == id)
    }

    fn cart_json(&self, session: &Session) -> Value {
        let mut count = 0;
        let mut total = Decimal::ZERO;
        let items: Vec<Value> = session
            .cart
            .iter()
            .filter_map(|line| {
                let product = self.product(line.product_id)?;
                let price = decimal(&product["price"])?;
                let unit = decimal(&product["sale_price"]).unwrap_or(price);
                count += line.quantity;
                total += unit * Decimal::from(line.quantity);
                Some(json!({
                    // IDs and quantities arrive as strings, like the real backend.
                    "id": line.id.to_string(),
                    "product_id": line.product_id.to_string(),
                    "name": product["name"],
                    "image": product["image"],
                    "quantity": line.quantity.to_string(),
                    "price": product["price"],
                    "sale_price": product["sale_price"],
                    "size": line.size,
                    "color": line.color,
                }))
            })
            .collect();

        json!({"success": true, "items": items, "count": count, "total": format!("{total:.2}")})
    }
}

fn session_id(headers: &HeaderMap) -> Option<String> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == SESSION_COOKIE)
        .map(|(_, value)| value.to_string())
}

fn respond(status: StatusCode, body: String, set_cookie: Option<&str>) -> Response<Body> {
    let mut builder = Response::builder()
        .status(status)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(id) = set_cookie {
        builder = builder.header(header::SET_COOKIE, format!("{SESSION_COOKIE}={id}; Path=/"));
    }
    builder.body(Body::from(body)).unwrap()
}

fn failure(message: &str) -> (StatusCode, Value) {
    (
        StatusCode::OK,
        json!({"success": false, "message": message}),
    )
}

async fn handle_request(
    State(shop): State<SharedShop>,
    Path(script): Path<String>,
    Query(query): Query<HashMap<String, String>>,
    method: Method,
    headers: HeaderMap,
    body: Bytes,
) -> Response<Body> {
    let mut shop = shop.lock().await;

    let body: Value = if body.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&body).unwrap_or(Value::Null)
    };
    let action = query.get("action").cloned().unwrap_or_default();

    shop.requests.push(CapturedRequest {
        method: method.clone(),
        script: script.clone(),
        action: action.clone(),
        query: query.clone(),
        content_type: headers
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string),
        headers: headers.clone(),
        body: body.clone(),
    });

    if shop.garbled {
        return Response::builder()
            .status(StatusCode::INTERNAL_SERVER_ERROR)
            .header(header::CONTENT_TYPE, "text/html")
            .body(Body::from("<html><body>Fatal error</body></html>"))
            .unwrap();
    }

    let (sid, new_session) = match session_id(&headers) {
        Some(sid) if shop.sessions.contains_key(&sid) => (sid, false),
        _ => {
            let sid = Uuid::new_v4().simple().to_string();
            shop.sessions.insert(sid.clone(), Session::default());
            (sid, true)
        }
    };
    shop.last_session = Some(sid.clone());

    let (status, reply) = match (script.as_str(), action.as_str()) {
        ("auth.php", "login") => login(&mut shop, &sid, &body),
        ("auth.php", "register") => register(&mut shop, &body),
        ("auth.php", "logout") => logout(&mut shop, &sid),
        ("auth.php", "check") => check(&shop, &sid),
        ("products.php", _) => products(&shop, &action, &query),
        ("cart.php", _) => cart(&mut shop, &sid, &method, &action, &query, &body),
        _ => (
            StatusCode::NOT_FOUND,
            json!({"success": false, "message": "Unknown endpoint"}),
        ),
    };

    respond(status, reply.to_string(), new_session.then_some(sid.as_str()))
}

fn login(shop: &mut Shop, sid: &str, body: &Value) -> (StatusCode, Value) {
    let found = shop
        .users
        .iter()
        .find(|u| body["email"] == u.email.as_str() && body["password"] == u.password.as_str())
        .cloned();

    match found {
        Some(user) => {
            if let Some(session) = shop.sessions.get_mut(sid) {
                session.user_id = Some(user.id);
            }
            (
                StatusCode::OK,
                json!({"success": true, "message": "Login successful", "user": user.to_json()}),
            )
        }
        // Error status with a well-formed envelope.
        None => (
            StatusCode::UNAUTHORIZED,
            json!({"success": false, "message": "Invalid email or password"}),
        ),
    }
}

fn register(shop: &mut Shop, body: &Value) -> (StatusCode, Value) {
    let text = |key: &str| body[key].as_str().unwrap_or_default().to_string();
    let email = text("email");

    if email.is_empty() || text("password").is_empty() {
        return failure("All fields are required");
    }
    if shop.users.iter().any(|u| u.email == email) {
        return failure("Email already registered");
    }

    let id = shop.next_user_id;
    shop.next_user_id += 1;
    shop.users.push(User {
        id,
        first_name: text("first_name"),
        last_name: text("last_name"),
        username: text("username"),
        email,
        password: text("password"),
    });

    (
        StatusCode::OK,
        json!({"success": true, "message": "Registration successful", "user_id": id}),
    )
}

fn logout(shop: &mut Shop, sid: &str) -> (StatusCode, Value) {
    if shop.fail_logout {
        return failure("Could not end session");
    }
    if let Some(session) = shop.sessions.get_mut(sid) {
        session.user_id = None;
    }
    (
        StatusCode::OK,
        json!({"success": true, "message": "Logged out"}),
    )
}

fn check(shop: &Shop, sid: &str) -> (StatusCode, Value) {
    let user = shop
        .sessions
        .get(sid)
        .and_then(|s| s.user_id)
        .and_then(|id| shop.user(id));

    let reply = match user {
        Some(user) => json!({"success": true, "logged_in": true, "user": user.to_json()}),
        None => json!({"success": true, "logged_in": false}),
    };
    (StatusCode::OK, reply)
}

fn products(shop: &Shop, action: &str, query: &HashMap<String, String>) -> (StatusCode, Value) {
    let number = |key: &str, default: usize| {
        query
            .get(key)
            .and_then(|v| v.parse().ok())
            .unwrap_or(default)
    };
    let limit = number("limit", 20);

    let listed: Vec<Value> = match action {
        "all" => shop
            .products
            .iter()
            .skip(number("offset", 0))
            .take(limit)
            .cloned()
            .collect(),
        "featured" => shop.products.iter().rev().take(limit).cloned().collect(),
        "search" => {
            let keyword = query.get("keyword").map(|k| k.to_lowercase()).unwrap_or_default();
            let category = query.get("category_id").and_then(|c| c.parse::<i64>().ok());
            shop.products
                .iter()
                .filter(|p| {
                    p["name"]
                        .as_str()
                        .is_some_and(|n| n.to_lowercase().contains(&keyword))
                })
                .filter(|p| {
                    category.is_none_or(|c| {
                        p["category_id"].as_str().and_then(|v| v.parse().ok()) == Some(c)
                    })
                })
                .take(limit)
                .cloned()
                .collect()
        }
        "single" => {
            let id = query.get("id").and_then(|v| v.parse().ok()).unwrap_or(0);
            return match shop.product(id) {
                Some(product) => (
                    StatusCode::OK,
                    json!({"success": true, "product": product}),
                ),
                None => (
                    StatusCode::NOT_FOUND,
                    json!({"success": false, "message": "Product not found"}),
                ),
            };
        }
        _ => return failure("Invalid action"),
    };

    (
        StatusCode::OK,
        json!({"success": true, "products": listed}),
    )
}

fn cart(
    shop: &mut Shop,
    sid: &str,
    method: &Method,
    action: &str,
    query: &HashMap<String, String>,
    body: &Value,
) -> (StatusCode, Value) {
    let as_i32 = |v: &Value| v.as_i64().and_then(|n| i32::try_from(n).ok());
    let as_u32 = |v: &Value| v.as_u64().and_then(|n| u32::try_from(n).ok());

    match (method.as_str(), action) {
        ("POST", "add") => {
            let Some(product_id) = as_i32(&body["product_id"]) else {
                return failure("Product ID is required");
            };
            if shop.product(product_id).is_none() {
                return failure("Product not found");
            }
            let quantity = as_u32(&body["quantity"]).unwrap_or(1).max(1);
            let size = body["size"].as_str().unwrap_or_default().to_string();
            let color = body["color"].as_str().unwrap_or_default().to_string();

            let line_id = shop.next_line_id;
            let Some(session) = shop.sessions.get_mut(sid) else {
                return failure("Session expired");
            };
            if let Some(line) = session
                .cart
                .iter_mut()
                .find(|l| l.product_id == product_id && l.size == size && l.color == color)
            {
                line.quantity += quantity;
            } else {
                session.cart.push(Line {
                    id: line_id,
                    product_id,
                    quantity,
                    size,
                    color,
                });
                shop.next_line_id += 1;
            }
            (
                StatusCode::OK,
                json!({"success": true, "message": "Item added to cart"}),
            )
        }
        ("GET", "get") => match shop.sessions.get(sid) {
            Some(session) => (StatusCode::OK, shop.cart_json(session)),
            None => failure("Session expired"),
        },
        ("PUT", "update") => {
            let (Some(cart_id), Some(quantity)) =
                (as_i32(&body["cart_id"]), as_u32(&body["quantity"]))
            else {
                return failure("Cart ID and quantity are required");
            };
            let Some(session) = shop.sessions.get_mut(sid) else {
                return failure("Session expired");
            };
            let Some(position) = session.cart.iter().position(|l| l.id == cart_id) else {
                return failure("Cart item not found");
            };
            if quantity == 0 {
                session.cart.remove(position);
            } else if let Some(line) = session.cart.get_mut(position) {
                line.quantity = quantity;
            }
            (
                StatusCode::OK,
                json!({"success": true, "message": "Cart updated"}),
            )
        }
        ("DELETE", "remove") => {
            let cart_id = query.get("cart_id").and_then(|v| v.parse::<i32>().ok());
            let Some(session) = shop.sessions.get_mut(sid) else {
                return failure("Session expired");
            };
            let before = session.cart.len();
            session.cart.retain(|l| Some(l.id) != cart_id);
            if session.cart.len() == before {
                return failure("Cart item not found");
            }
            (
                StatusCode::OK,
                json!({"success": true, "message": "Item removed"}),
            )
        }
        ("GET", "clear") => {
            if let Some(session) = shop.sessions.get_mut(sid) {
                session.cart.clear();
            }
            (StatusCode::OK, json!({"success": true}))
        }
        ("GET", "count") => {
            let count: u32 = shop
                .sessions
                .get(sid)
                .map(|s| s.cart.iter().map(|l| l.quantity).sum())
                .unwrap_or_default();
            (
                StatusCode::OK,
                json!({"success": true, "count": count.to_string()}),
            )
        }
        _ => (
            StatusCode::METHOD_NOT_ALLOWED,
            json!({"success": false, "message": "Invalid request method"}),
        ),
    }
}
