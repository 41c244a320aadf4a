//! Home owner manual template and attachment records.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::error::CoreError;

/// Section ids in template order.
pub const SECTION_IDS: &[&str] = &[
    "contacts",
    "appliances",
    "finishes",
    "systems",
    "maintenance",
    "warranties",
    "notes",
];

/// A document attached to a manual section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManualAttachment {
    pub section: String,
    pub name: String,
    pub url: String,
    pub content_type: String,
}

/// Validate the section an attachment is filed under.
pub fn validate_section(section: &str) -> Result<String, CoreError> {
    let trimmed = section.trim();
    if trimmed.is_empty() {
        return Err(CoreError::Validation("Attachment section must not be empty".into()));
    }
    Ok(trimmed.to_string())
}

/// The static section structure clients render the manual form from.
pub fn default_sections() -> Value {
    json!([
        {
            "id": "contacts",
            "title": "Important Contacts",
            "type": "contacts",
            "description": "Key contacts for your home",
            "fields": [
                {"name": "builder", "label": "Builder/GC", "type": "contact"},
                {"name": "electrician", "label": "Electrician", "type": "contact"},
                {"name": "plumber", "label": "Plumber", "type": "contact"},
                {"name": "hvac", "label": "HVAC", "type": "contact"},
                {"name": "hoa", "label": "HOA", "type": "contact"},
                {"name": "utility_electric", "label": "Electric Utility", "type": "contact"},
                {"name": "utility_water", "label": "Water Utility", "type": "contact"},
                {"name": "utility_gas", "label": "Gas Utility", "type": "contact"},
                {"name": "internet", "label": "Internet/Cable", "type": "contact"}
            ]
        },
        {
            "id": "appliances",
            "title": "Appliances",
            "type": "list",
            "description": "Installed appliances with model and serial numbers",
            "item_schema": [
                {"name": "item", "label": "Item Name", "type": "text"},
                {"name": "brand", "label": "Brand", "type": "text"},
                {"name": "model", "label": "Model #", "type": "text"},
                {"name": "serial", "label": "Serial #", "type": "text"},
                {"name": "install_date", "label": "Install Date", "type": "date"},
                {"name": "photo_url", "label": "Photo (Serial Label)", "type": "photo"}
            ],
            "default_items": [
                {"item": "Refrigerator"},
                {"item": "Range/Stove"},
                {"item": "Dishwasher"},
                {"item": "Microwave"},
                {"item": "Washer"},
                {"item": "Dryer"},
                {"item": "Water Heater"}
            ]
        },
        {
            "id": "finishes",
            "title": "Color Palette",
            "type": "color_palette",
            "description": "Paint colors used in the home",
            "photo_field": "palette_photo",
            "colors": [
                {"area": "Walls (Main)", "color_name": "", "color_code": ""},
                {"area": "Walls (Accent)", "color_name": "", "color_code": ""},
                {"area": "Trim/Molding", "color_name": "", "color_code": ""},
                {"area": "Ceilings", "color_name": "", "color_code": ""},
                {"area": "Cabinets", "color_name": "", "color_code": ""},
                {"area": "Exterior", "color_name": "", "color_code": ""}
            ]
        },
        {
            "id": "systems",
            "title": "Mechanical Systems",
            "type": "list",
            "description": "Technical details of home systems",
            "item_schema": [
                {"name": "name", "label": "System Name", "type": "text"},
                {"name": "details", "label": "Details/Notes", "type": "text"},
                {"name": "photo_url", "label": "Photo", "type": "photo"}
            ],
            "default_items": [
                {"name": "HVAC System", "details": "", "photo_url": ""},
                {"name": "Water Heater", "details": "", "photo_url": ""},
                {"name": "Breaker Panel", "details": "", "photo_url": ""},
                {"name": "Main Water Shutoff", "details": "", "photo_url": ""},
                {"name": "Air Filter", "details": "", "photo_url": ""},
                {"name": "Thermostat", "details": "", "photo_url": ""}
            ]
        },
        {
            "id": "maintenance",
            "title": "Maintenance Checklist",
            "type": "checklist",
            "description": "Regular maintenance tasks",
            "items": [
                {"task": "Replace HVAC filter", "frequency": "Every 1-3 months"},
                {"task": "Test smoke/CO detectors", "frequency": "Monthly"},
                {"task": "Clean gutters", "frequency": "Twice yearly"},
                {"task": "Service HVAC", "frequency": "Annually"},
                {"task": "Flush water heater", "frequency": "Annually"},
                {"task": "Check roof for damage", "frequency": "Annually"},
                {"task": "Inspect caulking (bathrooms/windows)", "frequency": "Annually"},
                {"task": "Test GFCIs", "frequency": "Monthly"},
                {"task": "Winterize hose bibs", "frequency": "Annually (Fall)"}
            ]
        },
        {
            "id": "warranties",
            "title": "Warranties & Documents",
            "type": "documents",
            "description": "Important warranties and documentation",
            "accepts": ["pdf", "jpg", "png"],
            "location_field": {
                "name": "physical_location",
                "label": "Physical Document Location",
                "placeholder": "e.g. Kitchen drawer, Filing cabinet"
            }
        },
        {
            "id": "notes",
            "title": "Additional Notes",
            "type": "text",
            "description": "Any additional information for the homeowner"
        }
    ])
}

/// Attachment file name for an exported manual.
pub fn export_filename(project_name: &str, extension: &str) -> String {
    let safe: String = project_name
        .trim()
        .chars()
        .map(|c| if c.is_alphanumeric() || c == '-' { c } else { '_' })
        .collect();
    format!("home_owner_manual_{safe}.{extension}")
}
