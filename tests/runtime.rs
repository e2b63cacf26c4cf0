//! End-to-end scheduler scenarios driven through a manual host clock and
//! the recording backend.

use std::cell::RefCell;
use std::rc::Rc;

use sketchloop::{
    Dimension, DrawCommand, Entity, Error, Key, ManualHost, PointerButton, RecordingBackend,
    RectMode, Runtime, Sketch, SketchConfig, SketchEvent, draw::color,
};

fn setup() -> (ManualHost, RecordingBackend, Runtime) {
    let _ = env_logger::builder().is_test(true).try_init();
    let host = ManualHost::new((800, 600));
    let backend = RecordingBackend::new();
    let runtime = Runtime::new(host.clone(), backend.clone());
    (host, backend, runtime)
}

/// A 50 fps config fires on every 20ms tick, which keeps scenarios exact.
fn fast_config() -> SketchConfig {
    SketchConfig {
        frame_rate: 50.0,
        ..Default::default()
    }
}

fn drawing_commands(log: &Rc<RefCell<Vec<DrawCommand>>>) -> Vec<DrawCommand> {
    log.borrow()
        .iter()
        .filter(|command| !matches!(command, DrawCommand::Save | DrawCommand::Restore))
        .cloned()
        .collect()
}

#[test]
fn two_layer_sketch_draws_only_on_the_selected_layer() {
    let (host, backend, mut runtime) = setup();
    let id = runtime
        .create_sketch(SketchConfig {
            width: Dimension::Px(100),
            height: Some(Dimension::Px(50)),
            layers: 2,
            autoplay: false,
            ..fast_config()
        })
        .unwrap();

    runtime
        .on_frame(id, |sketch: &mut Sketch| {
            sketch.set_layer(0)?;
            sketch.no_stroke();
            sketch.rect(50.0, 25.0, 20.0, 20.0);
            Ok(())
        })
        .unwrap();
    runtime.resume(id).unwrap();
    runtime.start();

    host.advance(20);
    runtime.tick();

    // Layer 0 shows the center-mode rectangle spanning (40,15)-(60,35).
    let layer0 = drawing_commands(&backend.surface_log(0).unwrap());
    assert_eq!(
        layer0,
        vec![DrawCommand::FillRect {
            x: 40.0,
            y: 15.0,
            w: 20.0,
            h: 20.0,
            color: color::BLACK,
        }]
    );

    // Layer 1 received only the frame's save/restore bracketing.
    assert!(drawing_commands(&backend.surface_log(1).unwrap()).is_empty());

    // The save/restore pairing is balanced on both layers.
    let sketch = runtime.sketch(id).unwrap();
    assert_eq!(sketch.layer(0).unwrap().stack_depth(), 0);
    assert_eq!(sketch.layer(1).unwrap().stack_depth(), 0);
    assert_eq!(sketch.frame_count(), 1);
}

#[test]
fn sketches_tick_in_registration_order_every_frame() {
    let (host, _backend, mut runtime) = setup();
    let order: Rc<RefCell<Vec<&'static str>>> = Rc::default();

    let a = runtime.create_sketch(fast_config()).unwrap();
    let b = runtime.create_sketch(fast_config()).unwrap();

    let log = Rc::clone(&order);
    runtime
        .on_frame(a, move |_: &mut Sketch| {
            log.borrow_mut().push("a");
            Ok(())
        })
        .unwrap();
    let log = Rc::clone(&order);
    runtime
        .on_frame(b, move |_: &mut Sketch| {
            log.borrow_mut().push("b");
            Ok(())
        })
        .unwrap();

    runtime.start();
    for _ in 0..4 {
        host.advance(20);
        runtime.tick();
    }

    assert_eq!(*order.borrow(), ["a", "b", "a", "b", "a", "b", "a", "b"]);
}

#[test]
fn global_hook_runs_before_any_sketch_each_tick() {
    let (host, _backend, mut runtime) = setup();
    let order: Rc<RefCell<Vec<&'static str>>> = Rc::default();

    let a = runtime.create_sketch(fast_config()).unwrap();
    let log = Rc::clone(&order);
    runtime
        .on_frame(a, move |_: &mut Sketch| {
            log.borrow_mut().push("sketch");
            Ok(())
        })
        .unwrap();

    let log = Rc::clone(&order);
    runtime.start_with(move || {
        log.borrow_mut().push("global");
        Ok(())
    });

    for _ in 0..2 {
        host.advance(20);
        runtime.tick();
    }

    assert_eq!(*order.borrow(), ["global", "sketch", "global", "sketch"]);
}

#[test]
fn stopped_runtime_ignores_ticks_until_restarted() {
    let (host, _backend, mut runtime) = setup();
    let id = runtime.create_sketch(fast_config()).unwrap();
    runtime
        .on_frame(id, |_: &mut Sketch| Ok(()))
        .unwrap();

    runtime.start();
    assert_eq!(host.frame_requests(), 1);

    host.advance(20);
    runtime.tick();
    assert_eq!(runtime.sketch(id).unwrap().frame_count(), 1);

    runtime.stop();
    host.advance(20);
    runtime.tick();
    assert_eq!(runtime.sketch(id).unwrap().frame_count(), 1);
    // A stopped tick does not reschedule.
    assert_eq!(host.frame_requests(), 2);

    runtime.start();
    host.advance(20);
    runtime.tick();
    assert_eq!(runtime.sketch(id).unwrap().frame_count(), 2);
}

#[test]
fn frame_rate_skips_ticks_that_are_not_due() {
    let (host, _backend, mut runtime) = setup();
    let id = runtime
        .create_sketch(SketchConfig {
            frame_rate: 25.0,
            ..Default::default()
        })
        .unwrap();
    runtime.on_frame(id, |_: &mut Sketch| Ok(())).unwrap();
    runtime.start();

    // 25 fps on a 20ms tick grid means every second tick produces a frame.
    for _ in 0..10 {
        host.advance(20);
        runtime.tick();
    }
    assert_eq!(runtime.sketch(id).unwrap().frame_count(), 5);
}

#[test]
fn pause_stops_frames_until_the_delayed_resume_fires() {
    let (host, _backend, mut runtime) = setup();
    let id = runtime.create_sketch(fast_config()).unwrap();
    runtime.on_frame(id, |_: &mut Sketch| Ok(())).unwrap();
    runtime.start();

    runtime.pause_for(id, 110).unwrap();

    for _ in 0..5 {
        host.advance(20);
        runtime.tick();
    }
    // Ticks at 20..100ms: still paused, nothing fired.
    assert_eq!(runtime.sketch(id).unwrap().frame_count(), 0);
    assert!(runtime.sketch(id).unwrap().paused());

    host.advance(20);
    runtime.tick();
    // The 110ms deadline elapsed: the sketch resumed and produced a frame.
    assert!(!runtime.sketch(id).unwrap().paused());
    assert_eq!(runtime.sketch(id).unwrap().frame_count(), 1);
}

#[test]
fn explicit_resume_wakes_a_paused_sketch() {
    let (host, _backend, mut runtime) = setup();
    let id = runtime
        .create_sketch(SketchConfig {
            autoplay: false,
            ..fast_config()
        })
        .unwrap();
    runtime.on_frame(id, |_: &mut Sketch| Ok(())).unwrap();
    runtime.start();

    host.advance(20);
    runtime.tick();
    assert_eq!(runtime.sketch(id).unwrap().frame_count(), 0);

    runtime.resume(id).unwrap();
    host.advance(20);
    runtime.tick();
    assert_eq!(runtime.sketch(id).unwrap().frame_count(), 1);
}

#[test]
fn hook_errors_leave_state_balanced_and_other_sketches_running() {
    let (host, _backend, mut runtime) = setup();
    let failing = runtime
        .create_sketch(SketchConfig {
            layers: 2,
            ..fast_config()
        })
        .unwrap();
    let healthy = runtime.create_sketch(fast_config()).unwrap();

    runtime
        .on_frame(failing, |sketch: &mut Sketch| {
            sketch.set_layer(0)?;
            sketch.fill("red");
            anyhow::bail!("deliberate failure")
        })
        .unwrap();
    runtime.on_frame(healthy, |_: &mut Sketch| Ok(())).unwrap();
    runtime.start();

    let requests_before = host.frame_requests();
    for _ in 0..3 {
        host.advance(20);
        runtime.tick();
    }

    // The failing sketch still restored every layer on every frame.
    let sketch = runtime.sketch(failing).unwrap();
    assert_eq!(sketch.layer(0).unwrap().stack_depth(), 0);
    assert_eq!(sketch.layer(1).unwrap().stack_depth(), 0);

    // The error neither blocked the sibling nor the drive loop.
    assert_eq!(runtime.sketch(healthy).unwrap().frame_count(), 3);
    assert_eq!(host.frame_requests(), requests_before + 3);
    assert!(!runtime.context().is_active());

    // The failed frames still counted, and the fill never leaked out of
    // the frame's save/restore bracket.
    assert_eq!(sketch.frame_count(), 3);
    assert_eq!(sketch.layer(0).unwrap().state().fill_color, color::BLACK);
}

#[test]
fn background_leaves_the_draw_state_untouched() {
    let (_host, backend, mut runtime) = setup();
    let id = runtime
        .create_sketch(SketchConfig {
            width: Dimension::Px(100),
            height: Some(Dimension::Px(50)),
            ..Default::default()
        })
        .unwrap();

    let sketch = runtime.sketch_mut(id).unwrap();
    sketch.fill("red");
    sketch.stroke("blue");
    sketch.stroke_weight(3.0);
    sketch.rect_mode(RectMode::Corner);

    sketch.background("white");
    sketch.rect(10.0, 10.0, 20.0, 20.0);

    let log = backend.surface_log(0).unwrap();
    assert_eq!(
        *log.borrow(),
        vec![
            // The background paints a full-surface fill inside its own
            // save/restore pair, with stroke disabled.
            DrawCommand::Save,
            DrawCommand::FillRect {
                x: 0.0,
                y: 0.0,
                w: 100.0,
                h: 50.0,
                color: color::WHITE,
            },
            DrawCommand::Restore,
            // The caller's corner mode, red fill, and blue stroke survive.
            DrawCommand::FillRect {
                x: 10.0,
                y: 10.0,
                w: 20.0,
                h: 20.0,
                color: color::RED,
            },
            DrawCommand::StrokeRect {
                x: 10.0,
                y: 10.0,
                w: 20.0,
                h: 20.0,
                color: color::BLUE,
                width: 3.0,
            },
        ]
    );
}

#[test]
fn background_image_covers_the_surface_corner_anchored() {
    let (_host, backend, mut runtime) = setup();
    let id = runtime
        .create_sketch(SketchConfig {
            width: Dimension::Px(100),
            height: Some(Dimension::Px(50)),
            ..Default::default()
        })
        .unwrap();

    let image = runtime.load_image("backdrop.png").unwrap();
    runtime.sketch_mut(id).unwrap().background_image(&image);

    let log = backend.surface_log(0).unwrap();
    assert_eq!(
        *log.borrow(),
        vec![DrawCommand::Image {
            id: image.id,
            x: 0.0,
            y: 0.0,
            size: Some((100.0, 50.0)),
        }]
    );
}

#[test]
fn named_containers_must_exist() {
    let (host, _backend, mut runtime) = setup();

    let missing = runtime.create_sketch(SketchConfig {
        container: Some("nowhere".to_string()),
        ..Default::default()
    });
    assert!(matches!(missing, Err(Error::UnknownContainer(name)) if name == "nowhere"));

    host.add_container("stage", 320, 240);
    let id = runtime
        .create_sketch(SketchConfig {
            width: Dimension::inherit(),
            height: Some(Dimension::inherit()),
            container: Some("stage".to_string()),
            ..Default::default()
        })
        .unwrap();

    let sketch = runtime.sketch(id).unwrap();
    assert_eq!((sketch.width(), sketch.height()), (320, 240));
    assert_eq!(sketch.name(), "stage");
    assert_eq!(runtime.sketch_by_name("stage"), Some(id));
}

#[test]
fn unregistered_sketches_wait_for_registration() {
    let (host, _backend, mut runtime) = setup();
    let id = runtime
        .create_sketch(SketchConfig {
            register: false,
            ..fast_config()
        })
        .unwrap();
    runtime.on_frame(id, |_: &mut Sketch| Ok(())).unwrap();
    runtime.start();

    host.advance(20);
    runtime.tick();
    assert_eq!(runtime.sketch(id).unwrap().frame_count(), 0);

    runtime.register(id).unwrap();
    runtime.register(id).unwrap(); // idempotent
    host.advance(20);
    runtime.tick();
    assert_eq!(runtime.sketch(id).unwrap().frame_count(), 1);
}

#[test]
fn entity_batches_run_update_then_render_in_insertion_order() {
    let (_host, _backend, mut runtime) = setup();
    let id = runtime.create_sketch(SketchConfig::default()).unwrap();
    let order: Rc<RefCell<Vec<String>>> = Rc::default();

    for name in ["first", "second"] {
        let update_log = Rc::clone(&order);
        let render_log = Rc::clone(&order);
        runtime
            .add_entity(
                Some(id),
                Entity::new(0.0, 0.0)
                    .named(name)
                    .on_update(move |entity: &mut Entity, _: &mut Sketch| {
                        entity.position.x += 1.0;
                        update_log.borrow_mut().push(format!("update-{name}"));
                        Ok(())
                    })
                    .on_render(move |_: &mut Entity, _: &mut Sketch| {
                        render_log.borrow_mut().push(format!("render-{name}"));
                        Ok(())
                    }),
            )
            .unwrap();
    }

    runtime.run_entities(id).unwrap();

    assert_eq!(
        *order.borrow(),
        ["update-first", "render-first", "update-second", "render-second"]
    );
    assert!(!runtime.context().is_active());

    let moved = runtime
        .sketch(id)
        .unwrap()
        .entity_by_name("first")
        .unwrap()
        .position;
    assert_eq!(moved.x, 1.0);
}

#[test]
fn entities_removed_mid_batch_finish_their_pass_and_are_swept() {
    let (_host, _backend, mut runtime) = setup();
    let id = runtime.create_sketch(SketchConfig::default()).unwrap();
    let order: Rc<RefCell<Vec<&'static str>>> = Rc::default();

    let render_log = Rc::clone(&order);
    runtime
        .add_entity(
            Some(id),
            Entity::new(0.0, 0.0)
                .on_update(|entity: &mut Entity, _: &mut Sketch| {
                    entity.remove();
                    Ok(())
                })
                .on_render(move |_: &mut Entity, _: &mut Sketch| {
                    render_log.borrow_mut().push("render");
                    Ok(())
                }),
        )
        .unwrap();

    runtime.run_entities(id).unwrap();

    // The render pass still ran for the removed entity, then the sweep
    // dropped it.
    assert_eq!(*order.borrow(), ["render"]);
    assert_eq!(runtime.sketch(id).unwrap().entity_count(), 0);

    runtime.run_entities(id).unwrap();
    assert_eq!(*order.borrow(), ["render"]);
}

#[test]
fn adding_an_entity_needs_a_target_or_an_active_sketch() {
    let (_host, _backend, mut runtime) = setup();
    let _id = runtime.create_sketch(SketchConfig::default()).unwrap();

    let result = runtime.add_entity(None, Entity::new(0.0, 0.0));
    assert!(matches!(result, Err(Error::NoActiveSketch)));
}

#[test]
fn entity_removal_by_id_is_identity_based() {
    let (_host, _backend, mut runtime) = setup();
    let id = runtime.create_sketch(SketchConfig::default()).unwrap();

    let a = runtime.add_entity(Some(id), Entity::new(0.0, 0.0)).unwrap();
    let _b = runtime.add_entity(Some(id), Entity::new(1.0, 1.0)).unwrap();

    let sketch = runtime.sketch_mut(id).unwrap();
    assert!(sketch.remove_entity(a));
    assert!(!sketch.remove_entity(a));
    assert_eq!(sketch.entity_count(), 1);
}

#[test]
fn pointer_events_update_state_and_fire_hooks_with_activation() {
    let (_host, _backend, mut runtime) = setup();
    let id = runtime.create_sketch(SketchConfig::default()).unwrap();
    let presses: Rc<RefCell<Vec<(f64, f64)>>> = Rc::default();

    let log = Rc::clone(&presses);
    runtime
        .on_event(id, SketchEvent::PointerPressed, move |sketch: &mut Sketch| {
            let origin = sketch.pointer().press_origin;
            log.borrow_mut().push((origin.x, origin.y));
            Ok(())
        })
        .unwrap();

    runtime.pointer_moved(id, 12.7, 34.2).unwrap();
    runtime.pointer_pressed(id, PointerButton::Left).unwrap();

    assert_eq!(*presses.borrow(), [(12.0, 34.0)]);
    let pointer = *runtime.sketch(id).unwrap().pointer();
    assert!(pointer.is_down());
    assert_eq!(pointer.button, Some(PointerButton::Left));

    runtime.pointer_released(id).unwrap();
    assert!(!runtime.sketch(id).unwrap().pointer().is_down());
    assert!(!runtime.context().is_active());
}

#[test]
fn keyboard_state_is_global_and_queryable_by_identity() {
    let (_host, _backend, mut runtime) = setup();
    let seen: Rc<RefCell<Vec<Key>>> = Rc::default();

    let log = Rc::clone(&seen);
    runtime.on_key_pressed(move |key| {
        log.borrow_mut().push(key);
        Ok(())
    });

    runtime.key_pressed(Key::Char('w'));
    runtime.key_pressed(Key::Shift);

    assert!(runtime.key_is_down(Key::Char('w')));
    assert!(runtime.key_is_down(Key::Shift));
    assert_eq!(*seen.borrow(), [Key::Char('w'), Key::Shift]);

    runtime.key_released(Key::Char('w'));
    assert!(!runtime.key_is_down(Key::Char('w')));
}

#[test]
fn init_hook_runs_once_with_the_context_activated() {
    let (_host, backend, mut runtime) = setup();
    let id = runtime.create_sketch(SketchConfig::default()).unwrap();

    runtime
        .init(id, |sketch: &mut Sketch| {
            sketch.background("black");
            Ok(())
        })
        .unwrap();

    assert!(!runtime.context().is_active());
    let log = backend.surface_log(0).unwrap();
    assert!(
        log.borrow()
            .iter()
            .any(|command| matches!(command, DrawCommand::FillRect { .. }))
    );
}

#[test]
fn context_facades_fall_back_to_window_defaults() {
    let (_host, _backend, mut runtime) = setup();
    let _id = runtime.create_sketch(SketchConfig::default()).unwrap();

    let context = runtime.context();
    assert!(!context.is_active());
    assert_eq!((context.width(), context.height()), (800, 600));
    assert!(context.pointer().is_none());
}

#[test]
fn added_layers_become_active_and_match_sketch_size() {
    let (_host, backend, mut runtime) = setup();
    let id = runtime
        .create_sketch(SketchConfig {
            width: Dimension::Px(120),
            height: Some(Dimension::Px(80)),
            ..Default::default()
        })
        .unwrap();

    let index = runtime.add_layer(id).unwrap();
    assert_eq!(index, 1);
    assert_eq!(backend.surface_size(1), Some((120, 80)));

    let sketch = runtime.sketch_mut(id).unwrap();
    assert_eq!(sketch.layer_count(), 2);
    assert_eq!(sketch.active_layer(), 1);

    assert!(matches!(
        sketch.set_layer(7),
        Err(Error::LayerOutOfRange { index: 7, count: 2 })
    ));
    sketch.set_layer(0).unwrap();
    assert_eq!(sketch.active_layer(), 0);
}

#[test]
fn construction_scale_is_applied_once_per_layer() {
    let (_host, backend, mut runtime) = setup();
    let _id = runtime
        .create_sketch(SketchConfig {
            layers: 2,
            scale_x: 2.0,
            scale_y: Some(3.0),
            ..Default::default()
        })
        .unwrap();

    for index in 0..2 {
        let log = backend.surface_log(index).unwrap();
        assert_eq!(
            *log.borrow(),
            vec![DrawCommand::Scale { sx: 2.0, sy: 3.0 }]
        );
    }
}
