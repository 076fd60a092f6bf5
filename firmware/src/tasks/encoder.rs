/*
    Encoder Task

    Both quadrature decoders run on PIO0. Every edge becomes one queue entry,
    the control tick drains the queue.
*/

use super::*;

pub type EncoderProducer = Producer<'static, EncoderEdge, ENCODER_QUEUE_SIZE>;

fn to_rotation(direction: EncoderDirection) -> Rotation {
    match direction {
        EncoderDirection::Clockwise => Rotation::Clockwise,
        EncoderDirection::CounterClockwise => Rotation::CounterClockwise,
    }
}

pub struct Encoders<'d> {
    left: PioEncoder<'d, PIO0, 0>,
    right: PioEncoder<'d, PIO0, 1>,
    producer: EncoderProducer,
    dropped: u32,
}

impl<'d> Encoders<'d> {
    pub fn new(left: PioEncoder<'d, PIO0, 0>, right: PioEncoder<'d, PIO0, 1>, producer: EncoderProducer) -> Self {
        Self {
            left,
            right,
            producer,
            dropped: 0,
        }
    }

    pub async fn run_encoder_task(&mut self) {
        loop {
            let edge = match select(self.left.read(), self.right.read()).await {
                Either::First(direction) => EncoderEdge {
                    wheel: Wheel::Left,
                    rotation: to_rotation(direction),
                },
                Either::Second(direction) => EncoderEdge {
                    wheel: Wheel::Right,
                    rotation: to_rotation(direction),
                },
            };

            if self.producer.enqueue(edge).is_err() {
                self.dropped = self.dropped.wrapping_add(1);
                if self.dropped % 100 == 1 {
                    log::warn!("encoder: queue full, {} edges dropped", self.dropped);
                }
            }
        }
    }
}

#[embassy_executor::task]
pub async fn encoder_task(mut encoders: Encoders<'static>) {
    encoders.run_encoder_task().await;
}
