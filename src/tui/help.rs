//! Help text content for the help modal

pub fn get_about_help() -> Vec<String> {
    vec![
        "About Cohort",
        "  Explore youth-program records from an .xlsx, .xls or .csv sheet.",
        "  Required columns: First Name, Last Name, Gender, Nationality, Age,",
        "  Degree, Qualification, Email, Status.",
    ]
    .into_iter()
    .map(str::to_string)
    .collect()
}

pub fn get_help_text() -> Vec<String> {
    vec![
        "Navigation:",
        "  h/j/k/l      Move left/down/up/right",
        "  Arrow keys   Move cursor",
        "  PageUp/Down  Scroll by page",
        "  g / G        First/last row",
        "  Tab          Switch between table and filter panel",
        "",
        "Sorting:",
        "  s / Enter    Sort by the column under the cursor (again to flip)",
        "",
        "Filtering:",
        "  /            Search names, email, nationality, degree, qualification",
        "  Space / x    Toggle the filter value under the cursor",
        "  c            Clear all filters",
        "",
        "Other:",
        "  :            Enter command mode",
        "  ?            Show this help",
        "  q / Ctrl+c   Quit",
    ]
    .into_iter()
    .map(str::to_string)
    .collect()
}

pub fn get_commands_help() -> Vec<String> {
    vec![
        "Commands",
        "  :open <file>              Load a spreadsheet (.xlsx, .xls, .csv)",
        "  :export [csv|xlsx] [dir]  Export the filtered records",
        "  :age MIN MAX              Limit ages (- for no limit, no args to reset)",
        "  :sort FIELD [asc|desc]    Sort by a column",
        "  :search TEXT              Set the search text",
        "  :clear                    Clear all filters",
        "  :help                     Show this help",
        "  :q                        Quit",
    ]
    .into_iter()
    .map(str::to_string)
    .collect()
}
