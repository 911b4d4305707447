//! Icon catalog and local asset table.
//!
//! The published site renders two kinds of non-URL icon references:
//!
//! - **asset keys** — short names like `html` or `tesla` that map to image
//!   files bundled with the site (`/assets/...`), matched on the exact key;
//! - **glyph names** — identifiers from the icon library (`Github`,
//!   `circle-help`, `SettingsIcon`), matched loosely: case, `-`/`_`
//!   separators, and a trailing `Icon` suffix are all ignored.
//!
//! Loose matching is done with a table generated once at first use: every
//! canonical glyph name is inserted under its normalized key and under the
//! normalized key plus an `icon` suffix. That turns the whole
//! exact/suffixed/formatted/formatted-suffixed lookup cascade into a single
//! map hit.

use once_cell::sync::Lazy;
use std::collections::HashMap;

/// Glyph used when a reference resolves to nothing.
pub const FALLBACK_ICON: &str = "CircleHelp";

/// Canonical glyph identifiers the renderer knows how to draw.
///
/// A curated slice of the icon library: everything the admin surface itself
/// uses plus the names portfolio content realistically reaches for.
static CANONICAL_ICONS: &[&str] = &[
    // Admin chrome
    "LayoutDashboard",
    "Settings",
    "Save",
    "Plus",
    "Trash2",
    "Upload",
    "LogOut",
    "Search",
    "Key",
    "KeyRound",
    // Fallback glyphs
    "CircleHelp",
    "HelpCircle",
    // Brands
    "Github",
    "Gitlab",
    "Linkedin",
    "Instagram",
    "Twitter",
    "Facebook",
    "Youtube",
    "Twitch",
    "Dribbble",
    "Figma",
    "Chrome",
    // Code and infrastructure
    "Code",
    "Code2",
    "CodeXml",
    "Terminal",
    "Server",
    "Database",
    "Cloud",
    "CloudCog",
    "Cpu",
    "CircuitBoard",
    "Binary",
    "Braces",
    "Brackets",
    "Bug",
    "GitBranch",
    "GitCommit",
    "GitMerge",
    "GitPullRequest",
    "FolderGit2",
    "HardDrive",
    "MemoryStick",
    "Network",
    "Wifi",
    "Bot",
    "Brain",
    "BrainCircuit",
    // Devices
    "Smartphone",
    "TabletSmartphone",
    "Monitor",
    "MonitorSmartphone",
    "Laptop",
    "Keyboard",
    "MousePointer",
    "Printer",
    "Camera",
    "Gamepad2",
    "Joystick",
    // Design
    "Palette",
    "PenTool",
    "Paintbrush",
    "Brush",
    "Pencil",
    "SquarePen",
    "Eraser",
    "Ruler",
    "Type",
    "Component",
    "Layers",
    "Boxes",
    "Box",
    "Package",
    "Puzzle",
    "Blocks",
    // Communication
    "Mail",
    "MailOpen",
    "Phone",
    "Send",
    "MessageCircle",
    "MessageSquare",
    "AtSign",
    "Hash",
    "Rss",
    "Radio",
    "Mic",
    // People and praise
    "User",
    "Users",
    "UserCheck",
    "Heart",
    "ThumbsUp",
    "Star",
    "Award",
    "Trophy",
    "Medal",
    "BadgeCheck",
    "GraduationCap",
    // Navigation and layout
    "Home",
    "Building2",
    "Menu",
    "X",
    "ArrowLeft",
    "ArrowRight",
    "ArrowUpRight",
    "ChevronDown",
    "ChevronUp",
    "ChevronLeft",
    "ChevronRight",
    "ExternalLink",
    "Link",
    "Link2",
    "Compass",
    "Map",
    "MapPin",
    "Navigation",
    "Target",
    "Crosshair",
    // Status and time
    "Check",
    "CircleCheck",
    "CircleX",
    "Clock",
    "Calendar",
    "Timer",
    "Gauge",
    "Activity",
    "TrendingUp",
    "BarChart3",
    "LineChart",
    "PieChart",
    // Misc content
    "Globe",
    "Briefcase",
    "Rocket",
    "Zap",
    "Flame",
    "Sparkles",
    "Wand2",
    "Lightbulb",
    "Wrench",
    "Hammer",
    "ShieldCheck",
    "Lock",
    "Unlock",
    "Eye",
    "EyeOff",
    "Sun",
    "Moon",
    "Book",
    "BookOpen",
    "FileText",
    "File",
    "Files",
    "Folder",
    "FolderOpen",
    "Image",
    "Film",
    "Video",
    "Play",
    "Pause",
    "Music",
    "Download",
    "RefreshCw",
    "RotateCw",
    "Repeat",
    "Shuffle",
    "Share",
    "Share2",
    "Copy",
    "Clipboard",
    "ClipboardCheck",
    "Scissors",
    "List",
    "ListChecks",
    "Table",
    "Infinity",
];

/// Bundled site assets addressed by exact key.
static LOCAL_ASSETS: &[(&str, &str)] = &[
    ("logo", "/assets/logo.svg"),
    ("menu", "/assets/menu.svg"),
    ("close", "/assets/close.svg"),
    ("backend", "/assets/backend.png"),
    ("creator", "/assets/creator.png"),
    ("mobile", "/assets/mobile.png"),
    ("web", "/assets/web.png"),
    ("github", "/assets/github.png"),
    ("css", "/assets/tech/css.png"),
    ("docker", "/assets/tech/docker.png"),
    ("figma", "/assets/tech/figma.png"),
    ("git", "/assets/tech/git.png"),
    ("html", "/assets/tech/html.png"),
    ("javascript", "/assets/tech/javascript.png"),
    ("mongodb", "/assets/tech/mongodb.png"),
    ("nodejs", "/assets/tech/nodejs.png"),
    ("reactjs", "/assets/tech/reactjs.png"),
    ("redux", "/assets/tech/redux.png"),
    ("tailwind", "/assets/tech/tailwind.png"),
    ("typescript", "/assets/tech/typescript.png"),
    ("threejs", "/assets/tech/threejs.svg"),
    ("meta", "/assets/company/meta.png"),
    ("shopify", "/assets/company/shopify.png"),
    ("starbucks", "/assets/company/starbucks.png"),
    ("tesla", "/assets/company/tesla.png"),
    ("carrent", "/assets/carrent.png"),
    ("jobit", "/assets/jobit.png"),
    ("tripguide", "/assets/tripguide.png"),
    ("project1", "/assets/project1.png"),
    ("project2", "/assets/project2.png"),
    ("project3", "/assets/project3.png"),
    ("user1", "/assets/user1.png"),
    ("user2", "/assets/user2.png"),
    ("user3", "/assets/user3.png"),
];

/// Normalized-key lookup table, built once on first access.
///
/// Keys are [`normalize_key`] outputs; each canonical name is present both
/// bare and with an `icon` suffix. On key collision the earlier entry in
/// [`CANONICAL_ICONS`] wins (the list is checked collision-free in tests).
static ICON_CATALOG: Lazy<HashMap<String, &'static str>> = Lazy::new(|| {
    let mut map = HashMap::with_capacity(CANONICAL_ICONS.len() * 2);
    for name in CANONICAL_ICONS {
        let key = normalize_key(name);
        map.entry(format!("{}icon", key)).or_insert(*name);
        map.entry(key).or_insert(*name);
    }
    map
});

static ASSET_TABLE: Lazy<HashMap<&'static str, &'static str>> =
    Lazy::new(|| LOCAL_ASSETS.iter().copied().collect());

/// Reduce a glyph reference to its lookup key: ASCII-lowercased, with
/// everything that is not a letter or digit stripped.
///
/// `circle-help`, `Circle_Help`, and `CircleHelp` all normalize to
/// `circlehelp`.
pub fn normalize_key(name: &str) -> String {
    name.chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

/// Resolve a glyph reference to its canonical identifier, if the catalog
/// knows it under any accepted spelling.
pub fn lookup_icon(name: &str) -> Option<&'static str> {
    let key = normalize_key(name);
    if key.is_empty() {
        return None;
    }
    ICON_CATALOG.get(&key).copied()
}

/// Resolve a bundled asset by exact key.
pub fn lookup_asset(key: &str) -> Option<&'static str> {
    ASSET_TABLE.get(key).copied()
}
