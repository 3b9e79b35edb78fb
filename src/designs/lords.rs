use serde::Serialize;

/// Deity artwork that can crown an invitation.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct Lord {
    pub id: &'static str,
    pub name: &'static str,
    pub image: &'static str,
}

pub const DEFAULT_LORD: &str = "ganesha";

pub static LORDS: [Lord; 5] = [
    Lord { id: "ganesha", name: "Lord Ganesha", image: "/static/lords/ganesha.png" },
    Lord { id: "venkateswara", name: "Lord Venkateswara", image: "/static/lords/venkateswara.png" },
    Lord { id: "shiva-parvati", name: "Shiva Parvati", image: "/static/lords/shiva-parvati.png" },
    Lord { id: "lakshmi", name: "Goddess Lakshmi", image: "/static/lords/lakshmi.png" },
    Lord { id: "radha-krishna", name: "Radha Krishna", image: "/static/lords/radha-krishna.png" },
];

pub fn lord_by_id(id: &str) -> Option<&'static Lord> {
    LORDS.iter().find(|l| l.id == id)
}

/// The profile's chosen deity, or the default when unset or unknown.
pub fn resolve_lord(id: Option<&str>) -> &'static Lord {
    id.and_then(lord_by_id)
        .or_else(|| lord_by_id(DEFAULT_LORD))
        .unwrap_or(&LORDS[0])
}
