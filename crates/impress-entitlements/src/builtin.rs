//! Built-in product catalog (feature metadata and subscription tiers).

use crate::feature::FeatureDefinition;
use crate::tier::TierDefinition;

pub const CORE_LOGISTICS: &str = "Core Logistics";
pub const MAPS: &str = "Maps";
pub const CHARTS: &str = "Charts";
pub const INTEGRATIONS: &str = "Integrations";
pub const ADVANCED: &str = "Advanced";

/// (key, label, category, description)
const FEATURES: &[(&str, &str, &str, &str)] = &[
    ("logistics", "Logistics Dashboard", CORE_LOGISTICS, "Overview of shipments, carriers and open orders"),
    ("shipments", "Shipment Management", CORE_LOGISTICS, "Create, edit and track individual shipments"),
    ("inventory", "Inventory Tracking", CORE_LOGISTICS, "Stock levels per SKU and location"),
    ("warehouses", "Warehouse Management", CORE_LOGISTICS, "Multi-warehouse layouts, bins and transfers"),
    ("routePlanning", "Route Planning", CORE_LOGISTICS, "Optimized multi-stop delivery routes"),
    ("fleetManagement", "Fleet Management", CORE_LOGISTICS, "Vehicles, drivers and maintenance schedules"),
    ("csvImport", "CSV Import/Export", CORE_LOGISTICS, "Bulk upload and download of records as CSV"),
    ("liveMap", "Live Map", MAPS, "Real-time vehicle positions on a map"),
    ("geofencing", "Geofencing", MAPS, "Alerts when vehicles enter or leave zones"),
    ("heatmaps", "Delivery Heatmaps", MAPS, "Density maps of deliveries and delays"),
    ("basicCharts", "Basic Charts", CHARTS, "Bar and line charts for daily volumes"),
    ("advancedCharts", "Advanced Charts", CHARTS, "Scatter, area and stacked charts with drill-down"),
    ("kpiReports", "KPI Reports", CHARTS, "Scheduled on-time delivery and cost reports"),
    ("customDashboards", "Custom Dashboards", CHARTS, "User-built dashboards from chart widgets"),
    ("apiAccess", "API Access", INTEGRATIONS, "REST API keys for external systems"),
    ("webhooks", "Webhooks", INTEGRATIONS, "Push shipment events to external endpoints"),
    ("sso", "Single Sign-On", INTEGRATIONS, "SAML and OIDC login"),
    ("auditLog", "Audit Log", INTEGRATIONS, "Who changed what and when"),
    ("erpConnectors", "ERP Connectors", INTEGRATIONS, "Two-way sync with ERP systems"),
    ("predictiveEta", "Predictive ETA", ADVANCED, "Arrival estimates from traffic and history"),
    ("aiVision", "AI Vision", ADVANCED, "Camera-based package damage detection"),
    ("demandForecasting", "Demand Forecasting", ADVANCED, "Inventory demand prediction per SKU"),
    ("anomalyDetection", "Anomaly Detection", ADVANCED, "Flags unusual delays and cost spikes"),
    ("chatAssistant", "Chat Assistant", ADVANCED, "Natural-language commands for common tasks"),
];

const FREE: &[&str] = &["logistics", "shipments", "basicCharts"];

const STARTER: &[&str] = &[
    "logistics",
    "shipments",
    "basicCharts",
    "inventory",
    "csvImport",
    "liveMap",
];

const PROFESSIONAL: &[&str] = &[
    "logistics",
    "shipments",
    "basicCharts",
    "inventory",
    "csvImport",
    "liveMap",
    "warehouses",
    "routePlanning",
    "geofencing",
    "advancedCharts",
    "kpiReports",
    "apiAccess",
];

const ENTERPRISE: &[&str] = &[
    "logistics",
    "shipments",
    "basicCharts",
    "inventory",
    "csvImport",
    "liveMap",
    "warehouses",
    "routePlanning",
    "geofencing",
    "advancedCharts",
    "kpiReports",
    "apiAccess",
    "fleetManagement",
    "heatmaps",
    "customDashboards",
    "webhooks",
    "sso",
    "auditLog",
    "predictiveEta",
];

const ULTIMATE: &[&str] = &[
    "logistics",
    "shipments",
    "basicCharts",
    "inventory",
    "csvImport",
    "liveMap",
    "warehouses",
    "routePlanning",
    "geofencing",
    "advancedCharts",
    "kpiReports",
    "apiAccess",
    "fleetManagement",
    "heatmaps",
    "customDashboards",
    "webhooks",
    "sso",
    "auditLog",
    "predictiveEta",
    "erpConnectors",
    "aiVision",
    "demandForecasting",
    "anomalyDetection",
    "chatAssistant",
];

/// (id, name, monthly price, features), lowest tier first.
const TIERS: &[(&str, &str, f64, &[&str])] = &[
    ("free", "Free", 0.0, FREE),
    ("starter", "Starter", 29.0, STARTER),
    ("professional", "Professional", 99.0, PROFESSIONAL),
    ("enterprise", "Enterprise", 299.0, ENTERPRISE),
    ("ultimate", "Ultimate", 599.0, ULTIMATE),
];

/// Feature definitions of the built-in catalog, in declaration order.
#[cfg_attr(feature = "native", uniffi::export)]
pub fn feature_definitions() -> Vec<FeatureDefinition> {
    FEATURES
        .iter()
        .map(|(key, label, category, description)| {
            FeatureDefinition::new(*key, *label, *category, *description)
        })
        .collect()
}

/// Tier definitions of the built-in catalog, lowest tier first.
#[cfg_attr(feature = "native", uniffi::export)]
pub fn tier_definitions() -> Vec<TierDefinition> {
    TIERS
        .iter()
        .map(|(id, name, price, features)| {
            TierDefinition::new(*id, *name, *price, features.iter().copied())
        })
        .collect()
}
