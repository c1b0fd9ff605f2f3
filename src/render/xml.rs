//! `ON_NSCHFDOPPR` XML assembly.
//!
//! Produces the universal transfer document (УПД) exchange format from
//! extracted header data, line items and totals. The output is text without
//! an XML declaration; see [`ConversionResult::to_bytes`].

use super::options::XmlSettings;
use super::result::ConversionResult;
use crate::model::{DocumentInfo, LineItem, Totals};
use crate::normalize::{
    escape_xml, format_amount, format_quantity, round_half_up, to_naive_date,
};
use chrono::{Local, NaiveDate};
use uuid::Uuid;

const FILE_ID_PREFIX: &str = "ON_NSCHFDOPPR";
const KND: &str = "1115131";
const INFO_TIME: &str = "12.00.00";
const TRANSFER_DOC_NAME: &str = "Универсальный передаточный документ";
const FACT_HJ: &str = "Документ об отгрузке товаров (выполнении работ), \
                       передаче имущественных прав (документ об оказании услуг)";
const DOC_NAME: &str = "Документ об отгрузке товаров (выполнении работ), \
                        передаче имущественных прав (Документ об оказании услуг)";
const XML_NAMESPACES: &str = "xmlns:xs=\"http://www.w3.org/2001/XMLSchema\" \
                              xmlns:xsi=\"http://www.w3.org/2001/XMLSchema-instance\"";

const DEFAULT_SELLER_NAME: &str = "Организация";
const DEFAULT_BUYER_NAME: &str = "Покупатель";
const DEFAULT_INN: &str = "0000000000";
const DEFAULT_KPP: &str = "000000000";
const DEFAULT_DOC_NUMBER: &str = "1";

/// Builds XML documents with a fixed set of settings.
#[derive(Debug, Clone, Default)]
pub struct XmlAssembler {
    settings: XmlSettings,
    today: Option<NaiveDate>,
}

impl XmlAssembler {
    /// Create an assembler.
    pub fn new(settings: XmlSettings) -> Self {
        Self {
            settings,
            today: None,
        }
    }

    /// Fix the date used when the document date is missing or unparseable.
    ///
    /// Defaults to the local current date.
    pub fn with_today(mut self, today: NaiveDate) -> Self {
        self.today = Some(today);
        self
    }

    /// Settings in use.
    pub fn settings(&self) -> &XmlSettings {
        &self.settings
    }

    /// Render one document.
    ///
    /// Every call generates fresh identifiers, so two renders of the same
    /// input differ only in UUIDs.
    pub fn assemble(
        &self,
        info: &DocumentInfo,
        items: &[LineItem],
        totals: &Totals,
    ) -> ConversionResult {
        let file_uuid = Uuid::new_v4();
        let basis_uuid = Uuid::new_v4().to_string();

        let seller_inn = info.seller_inn.as_deref().unwrap_or(DEFAULT_INN);
        let seller_kpp = info.seller_kpp.as_deref().unwrap_or(DEFAULT_KPP);
        let buyer_inn = info.buyer_inn.as_deref().unwrap_or(DEFAULT_INN);
        let buyer_kpp = info.buyer_kpp.as_deref().unwrap_or(DEFAULT_KPP);

        let date = self.document_date(info.doc_date.as_deref());
        let doc_date = date.format("%d.%m.%Y").to_string();

        let file_id = format!(
            "{}_{}_{}_{}_{}_{}_{}",
            FILE_ID_PREFIX,
            buyer_inn,
            buyer_kpp,
            seller_inn,
            seller_kpp,
            date.format("%Y%m%d"),
            file_uuid
        );
        log::debug!("Assembling {} with {} items", file_id, items.len());

        let s = &self.settings;
        let seller = Party {
            name: escape_xml(info.seller_name.as_deref().unwrap_or(DEFAULT_SELLER_NAME)),
            inn: escape_xml(seller_inn),
            kpp: escape_xml(seller_kpp),
            address: escape_xml(info.seller_address.as_deref().unwrap_or_default()),
        };
        let buyer = Party {
            name: escape_xml(info.buyer_name.as_deref().unwrap_or(DEFAULT_BUYER_NAME)),
            inn: escape_xml(buyer_inn),
            kpp: escape_xml(buyer_kpp),
            address: escape_xml(info.buyer_address.as_deref().unwrap_or_default()),
        };
        let doc_number = escape_xml(info.doc_number.as_deref().unwrap_or(DEFAULT_DOC_NUMBER));

        let mut xml = XmlLines::default();
        let file_open = format!(
            "<Файл {} ИдФайл=\"{}\" ВерсФорм=\"{}\" ВерсПрог=\"{}\">",
            XML_NAMESPACES,
            escape_xml(&file_id),
            escape_xml(&s.version),
            escape_xml(&s.program_version)
        );
        xml.line(0, file_open);

        let document_open = format!(
            "<Документ КНД=\"{}\" Функция=\"{}\" ПоФактХЖ=\"{}\" НаимДокОпр=\"{}\" \
             ДатаИнфПр=\"{}\" ВремИнфПр=\"{}\" НаимЭконСубСост=\"{}, ИНН/КПП {}/{}\">",
            KND,
            escape_xml(&s.function),
            FACT_HJ,
            DOC_NAME,
            doc_date,
            INFO_TIME,
            seller.name,
            seller.inn,
            seller.kpp
        );
        xml.line(1, document_open);

        let invoice_open = format!(
            "<СвСчФакт НомерДок=\"{}\" ДатаДок=\"{}\">",
            doc_number, doc_date
        );
        xml.line(2, invoice_open);
        xml.party(3, "СвПрод", &seller);
        xml.line(3, "<ГрузОт>");
        xml.line(4, "<ОнЖе>он же</ОнЖе>");
        xml.line(3, "</ГрузОт>");
        xml.party(3, "ГрузПолуч", &buyer);
        xml.line(3, transfer_doc("ДокПодтвОтгрНом", &doc_number, &doc_date));
        xml.party(3, "СвПокуп", &buyer);
        let currency = format!(
            "<ДенИзм КодОКВ=\"{}\" НаимОКВ=\"{}\" КурсВал=\"1.00\"/>",
            escape_xml(&s.currency_code),
            escape_xml(&s.currency_name)
        );
        xml.line(3, currency);
        xml.line(3, "<ИнфПолФХЖ1>");
        xml.text_info(4, "ИдентификаторДокументаОснования", &basis_uuid);
        xml.text_info(4, "ВидСчетаФактуры", "Реализация");
        xml.text_info(4, "ТолькоУслуги", "false");
        let shipment = format!(
            "№ п/п 1-{} № {} от {} г.",
            items.len(),
            doc_number,
            doc_date
        );
        xml.text_info(4, "ДокументОбОтгрузке", &shipment);
        xml.line(3, "</ИнфПолФХЖ1>");
        xml.line(2, "</СвСчФакт>");

        xml.line(2, "<ТаблСчФакт>");
        let country = escape_xml(&s.default_country);
        for item in items {
            xml.item(item, &country);
        }
        xml.totals(totals);
        xml.line(2, "</ТаблСчФакт>");

        xml.line(2, "<СвПродПер>");
        let transfer_open = format!(
            "<СвПер СодОпер=\"Товары переданы\" ВидОпер=\"Продажа\" ДатаПер=\"{}\">",
            doc_date
        );
        xml.line(3, transfer_open);
        xml.line(4, transfer_doc("ОснПер", &doc_number, &doc_date));
        xml.line(3, "</СвПер>");
        xml.line(3, "<ИнфПолФХЖ3>");
        xml.text_info(4, "ИдентификаторДокументаОснования", &basis_uuid);
        xml.line(3, "</ИнфПолФХЖ3>");
        xml.line(2, "</СвПродПер>");

        xml.line(2, "<Подписант ТипПодпис=\"2\" СпосПодтПолном=\"1\">");
        xml.line(3, "<ФИО Фамилия=\"-\" Имя=\"-\"/>");
        xml.line(2, "</Подписант>");
        xml.line(1, "</Документ>");
        xml.line(0, "</Файл>");

        ConversionResult::new(xml.finish(), file_id)
    }

    fn document_date(&self, raw: Option<&str>) -> NaiveDate {
        if let Some(date) = raw.and_then(to_naive_date) {
            return date;
        }
        if let Some(raw) = raw {
            log::warn!("Document date {:?} is not DD.MM.YYYY, using current date", raw);
        }
        self.today.unwrap_or_else(|| Local::now().date_naive())
    }
}

/// Render a document with the given settings.
pub fn generate_xml(
    info: &DocumentInfo,
    items: &[LineItem],
    totals: &Totals,
    settings: &XmlSettings,
) -> ConversionResult {
    XmlAssembler::new(settings.clone()).assemble(info, items, totals)
}

/// Escaped party attributes.
struct Party {
    name: String,
    inn: String,
    kpp: String,
    address: String,
}

fn transfer_doc(tag: &str, doc_number: &str, doc_date: &str) -> String {
    format!(
        "<{} РеквНаимДок=\"{}\" РеквНомерДок=\"{}\" РеквДатаДок=\"{}\"/>",
        tag, TRANSFER_DOC_NAME, doc_number, doc_date
    )
}

/// Tab-indented line buffer.
#[derive(Default)]
struct XmlLines {
    out: String,
}

impl XmlLines {
    fn line(&mut self, depth: usize, text: impl AsRef<str>) {
        if !self.out.is_empty() {
            self.out.push('\n');
        }
        for _ in 0..depth {
            self.out.push('\t');
        }
        self.out.push_str(text.as_ref());
    }

    fn party(&mut self, depth: usize, tag: &str, party: &Party) {
        self.line(depth, format!("<{}>", tag));
        self.line(depth + 1, "<ИдСв>");
        let legal_entity = format!(
            "<СвЮЛУч НаимОрг=\"{}\" ИННЮЛ=\"{}\" КПП=\"{}\"/>",
            party.name, party.inn, party.kpp
        );
        self.line(depth + 2, legal_entity);
        self.line(depth + 1, "</ИдСв>");
        self.line(depth + 1, "<Адрес>");
        let address = format!(
            "<АдрИнф КодСтр=\"643\" НаимСтран=\"РОССИЯ\" АдрТекст=\"{}\"/>",
            party.address
        );
        self.line(depth + 2, address);
        self.line(depth + 1, "</Адрес>");
        self.line(depth, format!("</{}>", tag));
    }

    fn text_info(&mut self, depth: usize, key: &str, value: &str) {
        let text = format!("<ТекстИнф Идентиф=\"{}\" Значен=\"{}\"/>", key, value);
        self.line(depth, text);
    }

    fn extra_info(&mut self, key: &str, value: &str) {
        let text = format!("<ИнфПолФХЖ2 Идентиф=\"{}\" Значен=\"{}\"/>", key, value);
        self.line(4, text);
    }

    fn item(&mut self, item: &LineItem, country: &str) {
        let id = format!("{}##", Uuid::new_v4());
        let name = escape_xml(&item.name);
        let okei = escape_xml(&item.unit_code);
        let unit = escape_xml(&item.unit_name);
        let article = escape_xml(&item.article);

        let item_open = format!(
            "<СведТов НомСтр=\"{}\" НаимТов=\"{}\" ОКЕИ_Тов=\"{}\" НаимЕдИзм=\"{}\" \
             КолТов=\"{}\" ЦенаТов=\"{}\" СтТовБезНДС=\"{}\" НалСт=\"{}\" СтТовУчНал=\"{}\">",
            item.row_number,
            name,
            okei,
            unit,
            format_quantity(item.quantity),
            format_amount(item.price, 2),
            format_amount(item.amount_no_vat, 2),
            escape_xml(&item.vat_rate.to_string()),
            format_amount(item.amount_with_vat, 2)
        );
        self.line(3, item_open);
        self.line(4, format!("<ДопСведТов ПрТовРаб=\"1\" КодТов=\"{}\">", article));
        self.line(5, format!("<КрНаимСтрПр>{}</КрНаимСтрПр>", country));
        self.line(4, "</ДопСведТов>");
        self.line(4, "<Акциз>");
        self.line(5, "<БезАкциз>без акциза</БезАкциз>");
        self.line(4, "</Акциз>");
        self.line(4, "<СумНал>");
        let vat = format_amount(item.vat_amount, 2);
        self.line(5, format!("<СумНал>{}</СумНал>", vat));
        self.line(4, "</СумНал>");
        self.extra_info("Для1С_Идентификатор", &id);
        self.extra_info("Для1С_Наименование", &name);
        self.extra_info("Для1С_ЕдиницаИзмерения", &unit);
        self.extra_info("Для1С_ЕдиницаИзмеренияКод", &okei);
        self.extra_info("Для1С_Артикул", &article);
        self.extra_info("Для1С_СтавкаНДС", &escape_xml(&item.vat_rate.plain()));
        self.extra_info("ИД", &id);
        self.line(3, "</СведТов>");
    }

    fn totals(&mut self, totals: &Totals) {
        let totals_open = format!(
            "<ВсегоОпл СтТовБезНДСВсего=\"{}\" СтТовУчНалВсего=\"{}\" КолНеттоВс=\"{}\">",
            format_amount(Some(totals.total_no_vat), 2),
            format_amount(Some(totals.total_with_vat), 2),
            rounded_quantity(totals.total_quantity)
        );
        self.line(3, totals_open);
        self.line(4, "<СумНалВсего>");
        let vat = format_amount(Some(totals.total_vat), 2);
        self.line(5, format!("<СумНал>{}</СумНал>", vat));
        self.line(4, "</СумНалВсего>");
        self.line(3, "</ВсегоОпл>");
    }

    fn finish(self) -> String {
        self.out
    }
}

/// Total quantity as written to `КолНеттоВс`.
pub fn rounded_quantity(total: f64) -> i64 {
    round_half_up(total, 0) as i64
}
