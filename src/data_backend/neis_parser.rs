use crate::constants::RESULT_CODE_SUCCESS;
use crate::data_types::neis_data_types::{RawMealRow, ResultHead};
use crate::data_types::{DailyMenu, MealSlot};
use crate::errors::MealError;

use quick_xml::errors::IllFormedError;
use quick_xml::events::Event;
use quick_xml::Reader;
use regex_lite::Regex;
use static_init::dynamic;

// allergen codes like "(1.5.6.)" or origin notes like "(돼지고기:국내산)"
#[dynamic]
static PARENS_RE: Regex = Regex::new(r"\([^)]*\)").unwrap();

#[dynamic]
static LINE_BREAK_RE: Regex = Regex::new(r"(?i)<br\s*/?>").unwrap();

#[derive(Debug, Clone, Copy, PartialEq)]
enum Field {
    ResultCode,
    ResultMessage,
    SlotCode,
    DishNames,
}

/// Turns a DDISH_NM blob into clean dish names, in order.
pub fn normalize_dish_names(raw: &str) -> Vec<String> {
    let without_parens = PARENS_RE.replace_all(raw, "");

    LINE_BREAK_RE
        .replace_all(&without_parens, "\n")
        .split('\n')
        .map(str::trim)
        .filter(|dish| !dish.is_empty())
        .map(str::to_string)
        .collect()
}

/// Parses a mealServiceDietInfo XML document.
///
/// A `RESULT` whose `CODE` is anything but `INFO-000` fails the whole
/// document. Later rows overwrite earlier rows of the same meal; rows
/// without dish text are ignored.
pub fn parse_menu_xml(xml_text: &str) -> Result<DailyMenu, MealError> {
    let mut reader = Reader::from_str(xml_text);
    reader.config_mut().trim_text(true);
    let mut buf = Vec::new();

    let mut menu = DailyMenu::default();
    let mut result_head: Option<ResultHead> = None;
    let mut in_result = false;
    let mut row: Option<RawMealRow> = None;
    let mut field: Option<Field> = None;
    let mut open_tags: Vec<String> = Vec::new();

    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(e) => {
                open_tags.push(String::from_utf8_lossy(e.name().into_inner()).into_owned());
                match e.local_name().into_inner() {
                    b"RESULT" if result_head.is_none() => {
                        result_head = Some(ResultHead::default());
                        in_result = true;
                    }
                    b"row" => row = Some(RawMealRow::default()),
                    name => field = open_field(name, in_result, &mut result_head, &mut row),
                }
            }
            Event::Empty(e) => match e.local_name().into_inner() {
                // a RESULT without CODE still counts as a failed result
                b"RESULT" if result_head.is_none() => result_head = Some(ResultHead::default()),
                name => {
                    // claim the field so a later duplicate in the same element is ignored
                    open_field(name, in_result, &mut result_head, &mut row);
                }
            },
            Event::End(e) => {
                open_tags.pop();
                match e.local_name().into_inner() {
                    b"RESULT" => in_result = false,
                    b"row" => {
                        field = None;
                        if let Some(finished) = row.take() {
                            apply_row(&mut menu, finished);
                        }
                    }
                    _ => field = None,
                }
            }
            Event::Text(e) => {
                let text = e
                    .unescape()
                    .map(|t| t.into_owned())
                    .unwrap_or_else(|_| String::from_utf8_lossy(&e).into_owned());
                if let Some(target) = field_text(field, &mut result_head, &mut row) {
                    target.push_str(&text);
                }
            }
            Event::CData(e) => {
                if let Some(target) = field_text(field, &mut result_head, &mut row) {
                    target.push_str(&String::from_utf8_lossy(&e));
                }
            }
            Event::Eof => {
                // quick-xml does not complain about elements left open at the end
                if let Some(tag) = open_tags.pop() {
                    return Err(MealError::Malformed(quick_xml::Error::IllFormed(
                        IllFormedError::MissingEndTag(tag),
                    )));
                }
                break;
            }
            _ => {}
        }
        buf.clear();
    }

    if let Some(head) = result_head {
        let code = head.code.unwrap_or_default().trim().to_string();
        if code != RESULT_CODE_SUCCESS {
            return Err(MealError::DataUnavailable {
                code,
                message: head.message.unwrap_or_default().trim().to_string(),
            });
        }
    }

    Ok(menu)
}

/// Starts capturing `name` if it is a field we care about and the
/// enclosing element has not seen it yet. Only the first occurrence counts.
fn open_field(
    name: &[u8],
    in_result: bool,
    result_head: &mut Option<ResultHead>,
    row: &mut Option<RawMealRow>,
) -> Option<Field> {
    let (slot, field) = match (name, in_result) {
        (b"CODE", true) => (result_head.as_mut().map(|h| &mut h.code), Field::ResultCode),
        (b"MESSAGE", true) => (
            result_head.as_mut().map(|h| &mut h.message),
            Field::ResultMessage,
        ),
        (b"MMEAL_SC_CODE", _) => (row.as_mut().map(|r| &mut r.slot_code), Field::SlotCode),
        (b"DDISH_NM", _) => (row.as_mut().map(|r| &mut r.dish_names), Field::DishNames),
        _ => return None,
    };

    match slot {
        Some(value) if value.is_none() => {
            *value = Some(String::new());
            Some(field)
        }
        _ => None,
    }
}

fn field_text<'a>(
    field: Option<Field>,
    result_head: &'a mut Option<ResultHead>,
    row: &'a mut Option<RawMealRow>,
) -> Option<&'a mut String> {
    match field? {
        Field::ResultCode => result_head.as_mut()?.code.as_mut(),
        Field::ResultMessage => result_head.as_mut()?.message.as_mut(),
        Field::SlotCode => row.as_mut()?.slot_code.as_mut(),
        Field::DishNames => row.as_mut()?.dish_names.as_mut(),
    }
}

fn apply_row(menu: &mut DailyMenu, row: RawMealRow) {
    let Some(dish_names) = row.dish_names.filter(|d| !d.is_empty()) else {
        return;
    };

    match row.slot_code.as_deref().and_then(MealSlot::from_code) {
        Some(slot) => menu.set_slot(slot, normalize_dish_names(&dish_names)),
        None => log::debug!("skipping row with meal code {:?}", row.slot_code),
    }
}
