//! Selectors for the booking site's markup. All of this is contingent on the
//! site keeping its current DOM; a markup change here is the expected way
//! for the whole flow to break.

pub const USERNAME_FIELD: &str = "//input[@id='weblogin_username']";
pub const PASSWORD_FIELD: &str = "//input[@id='weblogin_password']";
pub const LOGIN_BUTTON: &str = "//button[@id='weblogin_buttonlogin']";
pub const ACTIVE_SESSION_ALERT: &str =
    "//h1[normalize-space()='Login Warning - Active Session Alert']";
pub const RESUME_SESSION_CONTINUE: &str = "//button[@id='loginresumesession_buttoncontinue']";
pub const FACILITY_LANDING_HEADING: &str = "//h2[normalize-space()='Field House Courts']";

pub const FACILITY_TILE: &str =
    "//a[contains(@class, 'tile')]//h2[contains(text(), 'Field House Courts')]/ancestor::a";
pub const FACILITY_SEARCH_MARKER: &str = "//*[contains(text(), 'Facility Search')]";
pub const CLEAR_SELECTION_BUTTON: &str = "//button[contains(@class, \
     'multiselectlist__clearbutton') and .//span[contains(text(), 'Clear Selection')]]";
pub const SELECTION_LIST_NONEMPTY: &str =
    "//div[contains(@class, 'multiselectlist__selectionlist--hasselections')]";

pub const DATEPICKER_BUTTON: &str = "//button[contains(@class, 'datepicker-button')]";
pub const MONTH_DROPDOWN: &str = "//button[contains(@id, 'month_selection_button')]";
pub const DAY_DROPDOWN: &str = "//button[contains(@id, 'day_selection_button')]";
pub const YEAR_DROPDOWN: &str = "//button[contains(@id, 'year_selection_button')]";
pub const DATEPICKER_DONE: &str =
    "//button[contains(@class, 'datepicker-button-primary') and contains(text(), 'Done')]";
pub const SEARCH_BUTTON: &str = "//button[contains(@id, 'frwebsearch_buttonsearch')]";

/// A dropdown option by its visible label.
pub fn dropdown_option(label: &str) -> String {
    format!(
        "//li[@role='option']//span[contains(@class, 'listitem__text') and text()='{label}']"
    )
}

pub const RESULTS_DATEBLOCK: &str = "dateblock";
pub const RESULT_CARD: &str = "result-content";
pub const CARD_TITLE: &str = ".//h2/span";
pub const CARD_DESCRIPTION: &str = ".//div[contains(@class, 'result-header__description')]";
pub const CARD_SLOT_BUTTONS: &str =
    ".//a[contains(@class, 'button') and contains(@class, 'cart-button')]";
/// Class fragment marking a slot button as bookable.
pub const SLOT_AVAILABLE_CLASS: &str = "success";
/// Class fragment marking a slot click that opens a confirmation overlay.
pub const SLOT_OVERLAY_CLASS: &str = "instant-overlay";
pub const OVERLAY_CONTENT: &str = "instant-overlay-content";
pub const OVERLAY_CONTINUE_BUTTONS: &str = "//button[contains(text(), 'Continue') or \
     contains(text(), 'Book') or contains(text(), 'Add to Cart')]";
pub const CART_INDICATOR: &str = "//a[contains(@class, 'wt-cart-button')]";

pub const ADD_TO_CART_BUTTON: &str = "//button[contains(@class, \
     'multiselectlist__addbutton') and .//span[contains(text(), 'Add To Cart')]]";
pub const PROCESSING_HEADER: &str = "//h1[@id='processingprompts_header']";
pub const CELL_NUMBER_FIELD: &str = "//input[@id='question150906610']";
pub const BOOKING_REASON_FIELD: &str = "//input[@id='question150906642']";
pub const CHECKOUT_CONTINUE_BUTTONS: &str = "//button[contains(text(), 'Continue') or \
     contains(text(), 'Next')] | //input[@value='Continue' or @value='Next']";

pub const USER_MENU: &str = "//span[contains(@class, 'menuitem__title') and contains(., '#')]";
pub const LOGOUT_MENU_ENTRY: &str =
    "//span[contains(@class, 'menuitem__text') and text()='Logout']";
pub const LOGOUT_DIRECT_LINK: &str =
    "//a[contains(text(), 'Log Out') or contains(text(), 'Logout')]";
pub const SIGNED_OUT_MARKER: &str =
    "//span[@class='menuitem__text' and text()='Sign In / Register']";

pub const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];
