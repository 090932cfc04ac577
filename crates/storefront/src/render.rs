//! Observer loop that re-renders views when state changes.

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::debug;

use threadline_core::CartSnapshot;

use crate::notify::Notice;
use crate::session::SessionState;
use crate::views::{CartBadge, CartView, SessionView};

/// A sink for rendered views.
///
/// Every method receives a complete view; implementations replace what they
/// showed before.
pub trait Render: Send + 'static {
    fn render_cart(&mut self, cart: &CartView, badge: CartBadge);

    fn render_session(&mut self, session: &SessionView);

    fn render_notices(&mut self, _notices: &[Notice]) {}
}

/// State channels a renderer observes.
pub struct Observed {
    pub cart: watch::Receiver<CartSnapshot>,
    pub session: watch::Receiver<SessionState>,
    pub notices: watch::Receiver<Vec<Notice>>,
}

/// Render the current state, then re-render whatever changes until any of
/// the observed channels closes. The renderer is handed back at the end.
pub fn spawn_renderer<R: Render>(mut renderer: R, mut observed: Observed) -> JoinHandle<R> {
    tokio::spawn(async move {
        render_cart(&mut renderer, &mut observed.cart);
        render_session(&mut renderer, &mut observed.session);
        render_notices(&mut renderer, &mut observed.notices);

        loop {
            tokio::select! {
                changed = observed.cart.changed() => {
                    if changed.is_err() { break; }
                    render_cart(&mut renderer, &mut observed.cart);
                }
                changed = observed.session.changed() => {
                    if changed.is_err() { break; }
                    render_session(&mut renderer, &mut observed.session);
                }
                changed = observed.notices.changed() => {
                    if changed.is_err() { break; }
                    render_notices(&mut renderer, &mut observed.notices);
                }
            }
        }

        debug!("State closed, renderer stopped");
        renderer
    })
}

fn render_cart<R: Render>(renderer: &mut R, rx: &mut watch::Receiver<CartSnapshot>) {
    let snapshot = rx.borrow_and_update();
    renderer.render_cart(
        &CartView::from_snapshot(&snapshot),
        CartBadge::from_snapshot(&snapshot),
    );
}

fn render_session<R: Render>(renderer: &mut R, rx: &mut watch::Receiver<SessionState>) {
    let view = SessionView::from_state(&rx.borrow_and_update());
    renderer.render_session(&view);
}

fn render_notices<R: Render>(renderer: &mut R, rx: &mut watch::Receiver<Vec<Notice>>) {
    let notices = rx.borrow_and_update().clone();
    renderer.render_notices(&notices);
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    #[derive(Default)]
    struct Recorder {
        frames: Vec<String>,
    }

    impl Render for Recorder {
        fn render_cart(&mut self, cart: &CartView, badge: CartBadge) {
            self.frames.push(format!("cart {} badge={}", cart.lines.len(), badge.count));
        }

        fn render_session(&mut self, session: &SessionView) {
            self.frames.push(format!("session {}", session.heading()));
        }
    }

    #[tokio::test]
    async fn test_renders_initial_state_and_changes() {
        let (cart_tx, cart) = watch::channel(CartSnapshot::default());
        let (session_tx, session) = watch::channel(SessionState::Anonymous);
        let (notices_tx, notices) = watch::channel(Vec::new());

        let handle = spawn_renderer(
            Recorder::default(),
            Observed {
                cart,
                session,
                notices,
            },
        );
        tokio::task::yield_now().await;

        let snapshot: CartSnapshot = serde_json::from_value(json!({
            "items": [{"id": 1, "product_id": 1, "quantity": 2, "price": 5}],
            "count": 2,
            "total": 10
        }))
        .unwrap();
        cart_tx.send_replace(snapshot);
        tokio::task::yield_now().await;

        drop(session_tx);
        let recorder = handle.await.unwrap();
        drop((cart_tx, notices_tx));

        assert_eq!(
            recorder.frames,
            vec!["cart 0 badge=0", "session Login Now", "cart 1 badge=2"]
        );
    }
}
