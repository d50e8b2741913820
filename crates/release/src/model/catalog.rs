/// `release_meta.type` for permission declarations
pub const META_PERMISSION: i64 = 1;

/// Fixed category table, keyed by id
pub const CATEGORIES: &[(u32, &str)] = &[
    (1, "General"),
    (2, "Admin Tools"),
    (3, "Informational"),
    (4, "Anti-Griefing Tools"),
    (5, "Chat-Related"),
    (6, "Teleportation"),
    (7, "Mechanics"),
    (8, "Economy"),
    (9, "Minigame"),
    (10, "Fun"),
    (11, "World Editing and Management"),
    (12, "World Generators"),
    (13, "Developer Tools"),
    (14, "Educational"),
    (15, "Miscellaneous"),
];

/// Fixed permission table: id, name, description
pub const PERMISSIONS: &[(u32, &str, &str)] = &[
    (1, "Manage plugins", "installs/uninstalls/enables/disables plugins"),
    (2, "Manage worlds", "registers worlds"),
    (
        3,
        "Manage permissions",
        "only includes managing user permissions for other plugins",
    ),
    (4, "Manage entities", "registers new types of entities"),
    (5, "Manage blocks/items", "registers new blocks/items"),
    (6, "Manage tiles", "registers new tiles"),
    (7, "Manage world generators", "registers new world generators"),
    (
        8,
        "Database",
        "uses databases not local to this server instance, e.g. a MySQL database",
    ),
    (
        9,
        "Other files",
        "uses SQLite databases and YAML data folders. Do not include non-data-saving fixed-number files (i.e. config & lang files)",
    ),
    (10, "Permissions", "registers permissions"),
    (11, "Commands", "registers commands"),
    (
        12,
        "Edit world",
        "changes blocks in a world; do not check this if your plugin only edits worlds using world generators",
    ),
    (
        13,
        "External Internet clients",
        "starts client sockets to the external Internet, including MySQL and cURL calls",
    ),
    (
        14,
        "External Internet sockets",
        "listens on a server socket not started by PocketMine",
    ),
    (15, "Asynchronous tasks", "uses AsyncTask"),
    (
        16,
        "Custom threading",
        "starts threads; do not include AsyncTask (because they aren't threads)",
    ),
];

pub fn category_name(id: u32) -> Option<&'static str> {
    CATEGORIES
        .iter()
        .find(|(key, _)| *key == id)
        .map(|(_, name)| *name)
}

pub fn is_category(id: u32) -> bool {
    category_name(id).is_some()
}

pub fn permission_info(id: u32) -> Option<(&'static str, &'static str)> {
    PERMISSIONS
        .iter()
        .find(|(key, _, _)| *key == id)
        .map(|(_, name, desc)| (*name, *desc))
}

pub fn is_permission(id: u32) -> bool {
    permission_info(id).is_some()
}
