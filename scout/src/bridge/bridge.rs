use crate::bridge::model::BridgeModel;
use anyhow::Result;
use savorcore::session::DiscoverySession;
use savorcore::viewport::MapProjector;
use serde_json::json;
use std::{
    net::SocketAddr,
    sync::{Arc, RwLock},
    thread,
};
use tokio::runtime::Builder;
use warp::{http::StatusCode, Filter};

fn bridge_bind_address() -> SocketAddr {
    SocketAddr::from(([127, 0, 0, 1], 9400))
}

/// Hosts the local HTTP endpoint the renderer polls, and forwards refresh
/// requests into the discovery session.
pub struct DiscoveryBridge {
    state: Arc<RwLock<BridgeModel>>,
}

impl DiscoveryBridge {
    pub fn new(session: Arc<DiscoverySession>, projector: MapProjector) -> Self {
        let state = Arc::new(RwLock::new(BridgeModel::default()));
        let state_for_filter = state.clone();
        let state_filter = warp::any().map(move || state_for_filter.clone());
        let session_filter = warp::any().map(move || session.clone());
        let projector_filter = warp::any().map(move || projector);

        let get_route = warp::path("snapshot")
            .and(warp::get())
            .and(state_filter.clone())
            .map(|state: Arc<RwLock<BridgeModel>>| warp::reply::json(&*state.read().unwrap()));

        let refresh_route = warp::path("refresh")
            .and(warp::post())
            .and(state_filter)
            .and(session_filter)
            .and(projector_filter)
            .and_then(
                |state: Arc<RwLock<BridgeModel>>,
                 session: Arc<DiscoverySession>,
                 projector: MapProjector| async move {
                    match session.refresh().await {
                        Some(snapshot) => {
                            let model = BridgeModel::from_snapshot(&snapshot, &projector);
                            let mut guard = state.write().unwrap();
                            *guard = model;
                            Ok::<_, warp::Rejection>(warp::reply::with_status(
                                warp::reply::json(&json!({
                                    "status": "ok",
                                    "markers": guard.markers.len(),
                                    "degraded": guard.degraded
                                })),
                                StatusCode::OK,
                            ))
                        }
                        None => Ok(warp::reply::with_status(
                            warp::reply::json(&json!({"status": "superseded"})),
                            StatusCode::CONFLICT,
                        )),
                    }
                },
            );

        thread::spawn(move || {
            let routes = get_route.or(refresh_route);
            let runtime = Builder::new_current_thread()
                .enable_all()
                .build()
                .expect("failed to build runtime");
            runtime.block_on(async move {
                warp::serve(routes).run(bridge_bind_address()).await;
            });
        });

        Self { state }
    }

    pub fn publish(&self, model: &BridgeModel) -> Result<()> {
        let mut guard = self.state.write().unwrap();
        *guard = model.clone();
        println!(
            "[bridge] markers: {}, degraded: {}, approximate location: {}",
            guard.markers.len(),
            guard.degraded,
            guard.used_fallback
        );
        Ok(())
    }

    pub fn publish_status(&self, message: &str) {
        println!("[bridge] {}", message);
    }

    #[cfg(test)]
    pub fn snapshot(&self) -> BridgeModel {
        self.state.read().unwrap().clone()
    }
}
