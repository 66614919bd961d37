use crate::ErrorLocation;

use std::panic::Location;

/// **VALUE**: Verifies that `ErrorLocation::from()` records the file, line and column it is given.
///
/// **WHY THIS MATTERS**: Every receiver error prints its location. A broken capture makes
/// connection failures in the field impossible to trace back to the code that raised them.
#[test]
fn given_caller_location_when_error_location_created_then_captures_file_line_column() {
    // GIVEN: The location of this exact line
    let caller = Location::caller();

    // WHEN: Converting it into an ErrorLocation
    let location = ErrorLocation::from(caller);

    // THEN: All three coordinates survive the conversion
    assert_eq!(location.file, caller.file());
    assert_eq!(location.line, caller.line());
    assert_eq!(location.column, caller.column());
    assert!(location.column > 0, "Should capture column number");
}

/// **VALUE**: Verifies the `[file:line:column]` rendering used at the end of every error message.
///
/// **BUG THIS CATCHES**: Would catch a Display change that drops the brackets or a coordinate,
/// which would silently break log grepping for error sites.
#[test]
fn given_error_location_when_formatted_then_produces_bracketed_format() {
    // GIVEN: A fixed location
    let location = ErrorLocation {
        file: "backend/receiver-core/src/receiver/server.rs",
        line: 42,
        column: 17,
    };

    // WHEN: Formatting as string
    let formatted = location.to_string();

    // THEN: Should produce "[file:line:column]"
    assert_eq!(
        formatted,
        "[backend/receiver-core/src/receiver/server.rs:42:17]"
    );
}

/// **VALUE**: Verifies that `#[track_caller]` propagation gives each call site its own line.
///
/// **WHY THIS MATTERS**: The `From` conversions on the error enums rely on `#[track_caller]`.
/// If propagation breaks, every error would point at the conversion instead of the failure.
#[test]
fn given_multiple_call_sites_when_capturing_location_then_each_has_unique_line() {
    // GIVEN: A helper function that captures location
    #[track_caller]
    fn capture_location() -> ErrorLocation {
        ErrorLocation::from(Location::caller())
    }

    // WHEN: Capturing location from different call sites
    let loc1 = capture_location();
    let loc2 = capture_location();

    // THEN: Should have same file but sequential line numbers
    assert_eq!(loc1.file, loc2.file, "Should have same file");
    assert!(loc1.file.contains("error_location.rs"));
    assert_eq!(loc1.line + 1, loc2.line, "Lines should be sequential");
}
