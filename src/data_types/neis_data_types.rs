/// One `row` element of a mealServiceDietInfo response.
/// Only lives while the menu is being assembled.
#[derive(Debug, Default, PartialEq)]
pub struct RawMealRow {
    pub slot_code: Option<String>,
    pub dish_names: Option<String>,
}

/// Contents of the first `RESULT` element, if the response had one.
#[derive(Debug, Default, PartialEq)]
pub struct ResultHead {
    pub code: Option<String>,
    pub message: Option<String>,
}
