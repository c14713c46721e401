//! DOM wiring for the dashboard page.

use std::{cell::RefCell, rc::Rc};

use js_sys::{Array, Function, Object, Reflect};
use shared::domain::{page, TitleAnimation};
use tracing::{info, warn};
use wasm_bindgen::{prelude::*, JsCast};
use web_sys::{Document, Element, HtmlScriptElement, Window};

use crate::{
    carousel::{Carousel, Slide},
    icon::IconElement,
    synchronizer::{IconSynchronizer, PageEvent},
};

/// Carousel backed by the live `.carousel-item` children of the widget root.
pub struct DomCarousel {
    root: Element,
}

impl DomCarousel {
    pub fn new(root: Element) -> Self {
        Self { root }
    }
}

impl Carousel for DomCarousel {
    fn active_slide(&self) -> Option<Slide> {
        let selector = format!(".{}.{}", page::SLIDE_CLASS, page::ACTIVE_SLIDE_CLASS);
        let active = self.root.query_selector(&selector).ok().flatten()?;
        Some(Slide {
            icon_selector: active.get_attribute(page::ICON_ATTRIBUTE),
        })
    }
}

struct IconBinding {
    element: Element,
    carousel: DomCarousel,
    sync: IconSynchronizer,
}

impl IconBinding {
    fn refresh(&mut self, event: PageEvent) {
        if self.sync.handle_event(event, &self.carousel).is_updated() {
            self.element.set_class_name(&self.sync.icon().class_attr());
        }
    }
}

/// Entry point called by the page's module script once the wasm bundle is
/// instantiated.
#[wasm_bindgen]
pub fn start() -> Result<(), JsValue> {
    let window = web_sys::window().ok_or_else(|| JsValue::from_str("window unavailable"))?;
    let document = window
        .document()
        .ok_or_else(|| JsValue::from_str("document unavailable"))?;

    install_icon_sync(&window, &document)?;
    load_title_animation(&window, &document, &TitleAnimation::default())?;
    Ok(())
}

/// Wires `#energy-icon` to `#energyCarousel`. A no-op when either is missing.
pub fn install_icon_sync(window: &Window, document: &Document) -> Result<(), JsValue> {
    let (Some(icon), Some(carousel)) = (
        document.get_element_by_id(page::ENERGY_ICON_ID),
        document.get_element_by_id(page::ENERGY_CAROUSEL_ID),
    ) else {
        warn!("energy icon or carousel missing from page, icon sync disabled");
        return Ok(());
    };

    let binding = Rc::new(RefCell::new(IconBinding {
        sync: IconSynchronizer::new(IconElement::from_class_attr(&icon.class_name())),
        element: icon,
        carousel: DomCarousel::new(carousel.clone()),
    }));

    let slide_binding = binding.clone();
    let on_slide = Closure::<dyn FnMut(web_sys::Event)>::wrap(Box::new(move |_: web_sys::Event| {
        slide_binding
            .borrow_mut()
            .refresh(PageEvent::SlideTransitioned);
    }));
    carousel.add_event_listener_with_callback(
        page::SLIDE_TRANSITIONED_EVENT,
        on_slide.as_ref().unchecked_ref(),
    )?;
    on_slide.forget();

    // The bundle usually finishes loading after `load` has already fired.
    if document.ready_state() == "complete" {
        binding.borrow_mut().refresh(PageEvent::Loaded);
    } else {
        let load_binding = binding.clone();
        let on_load = Closure::<dyn FnMut(web_sys::Event)>::wrap(Box::new(move |_: web_sys::Event| {
            load_binding.borrow_mut().refresh(PageEvent::Loaded);
        }));
        window.add_event_listener_with_callback(
            page::PAGE_LOADED_EVENT,
            on_load.as_ref().unchecked_ref(),
        )?;
        on_load.forget();
    }

    info!("energy icon sync installed");
    Ok(())
}

/// Injects the Typed.js script and starts the title animation once it loads.
fn load_title_animation(
    window: &Window,
    document: &Document,
    config: &TitleAnimation,
) -> Result<(), JsValue> {
    let script = document
        .create_element("script")?
        .dyn_into::<HtmlScriptElement>()?;
    script.set_src(&config.library_url);
    script.set_async(true);

    let window = window.clone();
    let config = config.clone();
    let on_load = Closure::<dyn FnMut(web_sys::Event)>::wrap(Box::new(move |_: web_sys::Event| {
        if let Err(err) = construct_typed(&window, &config) {
            warn!(error = ?err, "title animation failed to start");
        }
    }));
    script.set_onload(Some(on_load.as_ref().unchecked_ref()));
    on_load.forget();

    let head = document
        .head()
        .ok_or_else(|| JsValue::from_str("document head unavailable"))?;
    head.append_child(&script)?;
    Ok(())
}

fn construct_typed(window: &Window, config: &TitleAnimation) -> Result<JsValue, JsValue> {
    let constructor = Reflect::get(window, &JsValue::from_str("Typed"))?.dyn_into::<Function>()?;

    let options = Object::new();
    let strings: Array = config
        .strings
        .iter()
        .map(|text| JsValue::from_str(text))
        .collect();
    let fields: [(&str, JsValue); 7] = [
        ("strings", strings.into()),
        ("cursorChar", JsValue::from_str(&config.cursor_char)),
        ("startDelay", JsValue::from(config.start_delay_ms)),
        ("typeSpeed", JsValue::from(config.type_speed_ms)),
        ("backSpeed", JsValue::from(config.back_speed_ms)),
        ("smartBackspace", JsValue::from(config.smart_backspace)),
        ("loop", JsValue::from(config.loop_forever)),
    ];
    for (key, value) in fields {
        Reflect::set(&options, &JsValue::from_str(key), &value)?;
    }

    Reflect::construct(
        &constructor,
        &Array::of2(&JsValue::from_str(&config.target_selector), &options),
    )
}
