//! Dashboard page. The map itself is drawn by Leaflet loaded from a CDN;
//! this page only feeds it the positions computed by the service.

use std::sync::Arc;

use axum::{
    http::header,
    response::{Html, IntoResponse},
    routing::get,
    Router,
};

use crate::Dashboard;

// ---

pub fn router() -> Router<Arc<Dashboard>> {
    Router::new().route("/", get(page))
}

async fn page() -> impl IntoResponse {
    (
        [(header::CACHE_CONTROL, "public, max-age=60")],
        Html(DASHBOARD_HTML),
    )
}

const DASHBOARD_HTML: &str = r##"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>Tracker Dashboard</title>
    <link rel="stylesheet" href="https://unpkg.com/leaflet@1.9.4/dist/leaflet.css">
    <style>
        * { box-sizing: border-box; margin: 0; padding: 0; }
        body { font-family: system-ui, -apple-system, sans-serif; background: #f8fafc; color: #1e293b; }
        .container { max-width: 1100px; margin: 0 auto; padding: 1.5rem; }
        header { display: flex; justify-content: space-between; align-items: center; margin-bottom: 1rem; gap: 1rem; }
        h1 { font-size: 1.25rem; font-weight: 600; }
        button { padding: 0.5rem 1rem; border: 1px solid #e2e8f0; border-radius: 0.375rem; background: #fff; cursor: pointer; }
        button:hover { border-color: #2563eb; color: #2563eb; }
        #map { height: 460px; border-radius: 0.5rem; border: 1px solid #e2e8f0; }
        #warning { display: none; background: #fef2f2; color: #b91c1c; border: 1px solid #fecaca; padding: 0.75rem 1rem; border-radius: 0.5rem; margin-bottom: 1rem; }
        .stats { display: grid; grid-template-columns: repeat(auto-fit, minmax(180px, 1fr)); gap: 0.75rem; margin-top: 1rem; }
        .stat { background: #fff; border: 1px solid #e2e8f0; border-radius: 0.5rem; padding: 0.75rem 1rem; }
        .stat .label { color: #64748b; font-size: 0.8rem; }
        .stat .value { font-size: 1.1rem; margin-top: 0.25rem; }
    </style>
</head>
<body>
<div class="container">
    <header>
        <h1>Tracker Dashboard</h1>
        <div>
            <button id="toggleViewButton">View Location History</button>
            <button id="settingsButton">Temperature Limit</button>
        </div>
    </header>
    <div id="warning"></div>
    <div id="map"></div>
    <div class="stats">
        <div class="stat"><div class="label">Temperature (&deg;C)</div><div class="value" id="temperature">N/A</div></div>
        <div class="stat"><div class="label">Humidity (%)</div><div class="value" id="humidity">N/A</div></div>
        <div class="stat"><div class="label">Movement</div><div class="value" id="movement"></div></div>
        <div class="stat"><div class="label">Status</div><div class="value" id="presence"></div></div>
        <div class="stat"><div class="label">Limit (&deg;C)</div><div class="value" id="threshold"></div></div>
    </div>
</div>
<script src="https://unpkg.com/leaflet@1.9.4/dist/leaflet.js"></script>
<script>
    const map = L.map('map').setView([-34.397, 150.644], 8);
    L.tileLayer('https://{s}.tile.openstreetmap.org/{z}/{x}/{y}.png', {
        attribution: '&copy; OpenStreetMap contributors'
    }).addTo(map);

    let marker = null;
    let trailLayer = L.layerGroup().addTo(map);
    let shownTrail = null;
    let shownNotice = null;

    function render(view) {
        document.getElementById('temperature').textContent = view.temperature;
        document.getElementById('humidity').textContent = view.humidity;
        document.getElementById('movement').textContent = view.movement;
        document.getElementById('presence').textContent = view.presence;
        document.getElementById('threshold').textContent = view.threshold.toFixed(1);

        const warning = document.getElementById('warning');
        if (view.banner) {
            warning.textContent = view.banner;
            warning.style.display = 'block';
        } else {
            warning.style.display = 'none';
        }

        if (view.marker) {
            const pos = [view.marker.lat, view.marker.lng];
            if (!marker) { marker = L.marker(pos).addTo(map); } else { marker.setLatLng(pos); }
            if (view.mode === 'live') { map.panTo([view.center.lat, view.center.lng]); }
        }

        const trailKey = view.history ? JSON.stringify(view.history.bounds) : null;
        if (trailKey !== shownTrail) {
            trailLayer.clearLayers();
            if (view.history) {
                view.history.points.forEach(p => {
                    L.circleMarker([p.lat, p.lng], { radius: 6, color: '#2563eb' }).addTo(trailLayer);
                });
                const b = view.history.bounds;
                map.fitBounds([[b.south_west.lat, b.south_west.lng], [b.north_east.lat, b.north_east.lng]]);
            }
            shownTrail = trailKey;
        }

        if (view.notice && view.notice !== shownNotice) { alert(view.notice); }
        shownNotice = view.notice;

        document.getElementById('toggleViewButton').textContent =
            view.mode === 'live' ? 'View Location History' : 'View Live Location';
    }

    async function refresh() {
        try {
            const res = await fetch('/api/dashboard');
            if (res.ok) { render(await res.json()); }
        } catch (e) {
            console.error('Dashboard refresh failed', e);
        }
    }

    document.getElementById('toggleViewButton').addEventListener('click', async () => {
        const res = await fetch('/api/view/toggle', { method: 'POST' });
        if (res.ok) { render(await res.json()); }
    });

    document.getElementById('settingsButton').addEventListener('click', async () => {
        const value = parseFloat(prompt('Please enter your preferred temperature limit:'));
        if (isNaN(value)) { return; }
        const res = await fetch('/api/threshold', {
            method: 'POST',
            headers: { 'Content-Type': 'application/json' },
            body: JSON.stringify({ value })
        });
        if (!res.ok) { alert((await res.json()).error); }
        refresh();
    });

    refresh();
    setInterval(refresh, 1000);
</script>
</body>
</html>
"##;
